use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Export target rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn resolve(&self, file_name: &str) -> PathBuf {
        Path::new(&self.base_path).join(file_name)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, file_name: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.resolve(file_name)).await?)
    }

    async fn write_file(&self, file_name: &str, data: &[u8]) -> Result<()> {
        let target = self.resolve(file_name);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).await?;
        }
        fs::write(&target, data).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), target.display());
        Ok(())
    }
}
