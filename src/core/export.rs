use crate::core::render::{render_listing, to_csv, to_json};
use crate::domain::model::Candidate;
use crate::domain::ports::Storage;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::Text => "candidates.txt",
            OutputFormat::Json => "candidates.json",
            OutputFormat::Csv => "candidates.csv",
        }
    }
}

pub fn render_candidates(candidates: &[Candidate], format: OutputFormat, width: usize) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_listing(candidates, width)),
        OutputFormat::Json => to_json(candidates),
        OutputFormat::Csv => to_csv(candidates),
    }
}

/// Writes the rendered catalog to storage and returns the file name used.
pub async fn export_candidates<S: Storage>(
    storage: &S,
    candidates: &[Candidate],
    format: OutputFormat,
    width: usize,
) -> Result<&'static str> {
    let content = render_candidates(candidates, format, width)?;
    let file_name = format.file_name();

    tracing::debug!("Exporting {} candidates as {:?}", candidates.len(), format);
    storage.write_file(file_name, content.as_bytes()).await?;
    Ok(file_name)
}
