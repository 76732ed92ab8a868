use crate::core::versions::compare_versions;
use crate::domain::model::{CandidateVersion, LocalCandidate, Version};
use crate::utils::error::{CatalogError, Result};
use std::fs;
use std::path::Path;

const CURRENT_LINK: &str = "current";

/// Reads installed candidates from an SDKMAN candidates directory.
///
/// Layout: `<dir>/<candidate>/<version>/` plus an optional
/// `<dir>/<candidate>/current` entry. `current` marks the version directory
/// it resolves to: a symlink, a junction or a bind mount. A plain copied
/// directory resolves to itself and marks nothing.
pub fn scan_candidates_dir(dir: &Path) -> Result<Vec<LocalCandidate>> {
    if !dir.is_dir() {
        tracing::debug!("{} is not a directory", dir.display());
        return Err(CatalogError::MissingConfigError {
            field: "candidates_dir".to_string(),
        });
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(binary_name) = file_name(&path) else {
            continue;
        };

        let versions = scan_versions(&path)?;
        tracing::debug!("Found {} local versions of {}", versions.len(), binary_name);
        candidates.push(LocalCandidate::new(binary_name, versions));
    }

    candidates.sort_by(|a, b| a.binary_name.cmp(&b.binary_name));
    Ok(candidates)
}

/// Scans a single candidate; `Ok(None)` when it has never been installed.
pub fn scan_candidate(dir: &Path, binary_name: &str) -> Result<Option<LocalCandidate>> {
    let path = dir.join(binary_name);
    if !path.is_dir() {
        return Ok(None);
    }
    let versions = scan_versions(&path)?;
    Ok(Some(LocalCandidate::new(binary_name, versions)))
}

fn scan_versions(candidate_dir: &Path) -> Result<Vec<CandidateVersion>> {
    let current = fs::canonicalize(candidate_dir.join(CURRENT_LINK)).ok();
    let mut versions = Vec::new();

    for entry in fs::read_dir(candidate_dir)? {
        let path = entry?.path();
        let Some(name) = file_name(&path) else {
            continue;
        };
        if name == CURRENT_LINK || !path.is_dir() {
            continue;
        }
        let is_current = current.is_some() && fs::canonicalize(&path).ok() == current;
        versions.push(CandidateVersion::new_local(Version::other(name), is_current));
    }

    versions.sort_by(|a, b| compare_versions(b.identifier(), a.identifier()));
    Ok(versions)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}
