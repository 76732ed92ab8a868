use crate::core::catalog::parse_candidates_lenient;
use crate::core::local::{scan_candidate, scan_candidates_dir};
use crate::core::versions::{compare_versions, parse_available_versions};
use crate::domain::model::{Candidate, CandidateVersion, LocalCandidate, Version};
use crate::domain::ports::CandidateSource;
use crate::utils::error::{CatalogError, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Joins remote catalog data with the local installation state.
pub struct CatalogService<S: CandidateSource> {
    source: S,
    candidates_dir: Option<PathBuf>,
}

impl<S: CandidateSource> CatalogService<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            candidates_dir: None,
        }
    }

    pub fn with_candidates_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.candidates_dir = dir;
        self
    }

    pub async fn list_candidates(&self) -> Result<Vec<Candidate>> {
        tracing::info!("Fetching candidate catalog");
        let listing = self.source.candidate_list().await?;
        let mut candidates = parse_candidates_lenient(&listing)?;
        tracing::info!("Fetched {} candidates", candidates.len());

        let locals: HashMap<String, LocalCandidate> = self
            .local_candidates()?
            .into_iter()
            .map(|local| (local.binary_name.clone(), local))
            .collect();

        for candidate in &mut candidates {
            if let Some(local) = locals.get(&candidate.binary_name) {
                candidate.with_local(local);
            }
        }

        Ok(candidates)
    }

    /// Looks up by binary name first, then by display name ignoring case.
    pub async fn find_candidate(&self, name: &str) -> Result<Candidate> {
        let candidates = self.list_candidates().await?;
        let needle = name.trim();

        candidates
            .iter()
            .find(|c| c.binary_name == needle)
            .or_else(|| candidates.iter().find(|c| c.name.eq_ignore_ascii_case(needle)))
            .cloned()
            .ok_or_else(|| CatalogError::CandidateNotFound {
                name: needle.to_string(),
            })
    }

    pub async fn candidate_versions(&self, binary_name: &str) -> Result<Vec<CandidateVersion>> {
        let local = self.local_candidate(binary_name)?;
        let installed = local
            .as_ref()
            .map(LocalCandidate::version_identifiers)
            .unwrap_or_default();
        let current = local.as_ref().and_then(LocalCandidate::current_version);

        tracing::info!("Fetching versions of {}", binary_name);
        let listing = self
            .source
            .candidate_versions(binary_name, current, &installed)
            .await?;
        let mut versions = parse_available_versions(&listing)?;

        if let Some(local) = &local {
            merge_local_versions(&mut versions, local);
        }

        Ok(versions)
    }

    pub async fn default_version(&self, binary_name: &str) -> Result<String> {
        let version = self.source.default_version(binary_name).await?;
        if version.is_empty() {
            return Err(CatalogError::CandidateNotFound {
                name: binary_name.to_string(),
            });
        }
        Ok(version)
    }

    pub async fn candidate_names(&self) -> Result<Vec<String>> {
        self.source.candidate_names().await
    }

    /// Installed candidates; requires a configured candidates directory.
    pub fn installed_candidates(&self) -> Result<Vec<LocalCandidate>> {
        let dir = self
            .candidates_dir
            .as_deref()
            .ok_or_else(|| CatalogError::MissingConfigError {
                field: "candidates_dir".to_string(),
            })?;
        scan_candidates_dir(dir)
    }

    fn local_candidates(&self) -> Result<Vec<LocalCandidate>> {
        match self.candidates_dir.as_deref() {
            Some(dir) if dir.is_dir() => scan_candidates_dir(dir),
            Some(dir) => {
                tracing::debug!("Candidates directory {} does not exist", dir.display());
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }

    fn local_candidate(&self, binary_name: &str) -> Result<Option<LocalCandidate>> {
        match self.candidates_dir.as_deref() {
            Some(dir) => scan_candidate(dir, binary_name),
            None => Ok(None),
        }
    }
}

/// Local state wins over whatever markers the API echoed back.
pub fn merge_local_versions(versions: &mut Vec<CandidateVersion>, local: &LocalCandidate) {
    let current = local.current_version();

    for version in versions.iter_mut() {
        if local.has_version(version.identifier()) {
            version.installed = true;
            version.current = current == Some(version.identifier());
        } else if !version.local_only {
            version.installed = false;
            version.current = false;
        }
    }

    let java = versions.iter().any(|v| v.version.is_java());
    for local_version in &local.versions {
        let identifier = local_version.identifier();
        if versions.iter().any(|v| v.identifier() == identifier) {
            continue;
        }
        let version = if java {
            Version::Java {
                vendor: String::new(),
                usage: if local_version.current { ">>>".to_string() } else { String::new() },
                version: identifier.to_string(),
                distribution: "none".to_string(),
                status: "local only".to_string(),
                identifier: identifier.to_string(),
            }
        } else {
            Version::other(identifier)
        };
        versions.push(CandidateVersion {
            version,
            installed: true,
            current: local_version.current,
            local_only: true,
        });
    }

    // The Java table keeps the vendor grouping; the grid stays newest first.
    if !java {
        versions.sort_by(|a, b| compare_versions(b.identifier(), a.identifier()));
    }
}
