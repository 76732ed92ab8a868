use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// One record of the candidate catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub binary_name: String,
    pub description: String,
    pub homepage: String,
    pub default_version: String,
    #[serde(default)]
    pub installed_versions: Vec<String>,
    #[serde(default)]
    pub current_version: Option<String>,
}

impl Candidate {
    pub fn new(
        name: impl Into<String>,
        binary_name: impl Into<String>,
        description: impl Into<String>,
        homepage: impl Into<String>,
        default_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            binary_name: binary_name.into(),
            description: description.into(),
            homepage: homepage.into(),
            default_version: default_version.into(),
            installed_versions: Vec::new(),
            current_version: None,
        }
    }

    pub fn install_command(&self) -> String {
        format!("$ sdk install {}", self.binary_name)
    }

    pub fn is_installed(&self) -> bool {
        !self.installed_versions.is_empty()
    }

    pub fn with_local(&mut self, local: &LocalCandidate) -> &mut Self {
        self.installed_versions = local.version_identifiers();
        self.current_version = local.current_version().map(str::to_string);
        self
    }
}

/// A single entry of a version listing.
///
/// Java listings are tables with vendor and distribution columns, every
/// other candidate lists bare version strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Version {
    Java {
        vendor: String,
        usage: String,
        version: String,
        distribution: String,
        status: String,
        identifier: String,
    },
    Other {
        version: String,
    },
}

impl Version {
    pub fn other(version: impl Into<String>) -> Self {
        Version::Other {
            version: version.into(),
        }
    }

    /// The value accepted by `sdk install <candidate> <identifier>`.
    pub fn identifier(&self) -> &str {
        match self {
            Version::Java { identifier, .. } => identifier,
            Version::Other { version } => version,
        }
    }

    pub fn is_java(&self) -> bool {
        matches!(self, Version::Java { .. })
    }
}

impl FromStr for Version {
    type Err = Infallible;

    /// Never fails: missing Java columns are left empty and any other line
    /// becomes `Other` holding the trimmed text.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.contains(" | ") {
            let parts: Vec<&str> = input.split('|').map(str::trim).collect();
            let at = |i: usize| parts.get(i).map(|p| p.to_string()).unwrap_or_default();
            Ok(Version::Java {
                vendor: at(0),
                usage: at(1),
                version: at(2),
                distribution: at(3),
                status: at(4),
                identifier: at(5),
            })
        } else {
            Ok(Version::other(input.trim()))
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateVersion {
    pub version: Version,
    pub installed: bool,
    pub current: bool,
    /// Installed locally but not offered by the API.
    #[serde(default)]
    pub local_only: bool,
}

impl CandidateVersion {
    pub fn new_remote(version: Version) -> Self {
        Self {
            version,
            installed: false,
            current: false,
            local_only: false,
        }
    }

    pub fn new_local(version: Version, current: bool) -> Self {
        Self {
            version,
            installed: true,
            current,
            local_only: false,
        }
    }

    pub fn identifier(&self) -> &str {
        self.version.identifier()
    }
}

/// Installed state of one candidate as found in the candidates directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCandidate {
    pub binary_name: String,
    pub versions: Vec<CandidateVersion>,
}

impl LocalCandidate {
    pub fn new(binary_name: impl Into<String>, versions: Vec<CandidateVersion>) -> Self {
        Self {
            binary_name: binary_name.into(),
            versions,
        }
    }

    pub fn current_version(&self) -> Option<&str> {
        self.versions
            .iter()
            .find(|v| v.current)
            .map(CandidateVersion::identifier)
    }

    pub fn version_identifiers(&self) -> Vec<String> {
        self.versions
            .iter()
            .map(|v| v.identifier().to_string())
            .collect()
    }

    pub fn has_version(&self, identifier: &str) -> bool {
        self.versions.iter().any(|v| v.identifier() == identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_row_parses_into_columns() {
        let row = " Corretto      | >>> | 17.0.7       | amzn    | installed  | 17.0.7-amzn";
        let version: Version = row.parse().unwrap();

        assert_eq!(
            version,
            Version::Java {
                vendor: "Corretto".to_string(),
                usage: ">>>".to_string(),
                version: "17.0.7".to_string(),
                distribution: "amzn".to_string(),
                status: "installed".to_string(),
                identifier: "17.0.7-amzn".to_string(),
            }
        );
        assert_eq!(version.identifier(), "17.0.7-amzn");
    }

    #[test]
    fn test_java_row_with_missing_columns_leaves_them_empty() {
        let version: Version = " Corretto | | 17.0.7".parse().unwrap();

        match version {
            Version::Java {
                vendor,
                usage,
                version,
                identifier,
                ..
            } => {
                assert_eq!(vendor, "Corretto");
                assert!(usage.is_empty());
                assert_eq!(version, "17.0.7");
                assert!(identifier.is_empty());
            }
            other => panic!("expected java row, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_version_is_trimmed() {
        let version: Version = "  8.0.2 ".parse().unwrap();
        assert_eq!(version, Version::other("8.0.2"));
        assert!(!version.is_java());
        assert_eq!("   ".parse::<Version>().unwrap(), Version::other(""));
    }

    #[test]
    fn test_install_command_uses_binary_name() {
        let candidate = Candidate::new(
            "Gradle",
            "gradle",
            "Build tool",
            "https://gradle.org",
            "8.0.2",
        );
        assert_eq!(candidate.install_command(), "$ sdk install gradle");
        assert!(!candidate.is_installed());
    }

    #[test]
    fn test_with_local_copies_installed_state() {
        let local = LocalCandidate::new(
            "gradle",
            vec![
                CandidateVersion::new_local(Version::other("8.0.2"), true),
                CandidateVersion::new_local(Version::other("7.6"), false),
            ],
        );
        let mut candidate =
            Candidate::new("Gradle", "gradle", "", "https://gradle.org", "8.0.2");
        candidate.with_local(&local);

        assert!(candidate.is_installed());
        assert_eq!(candidate.installed_versions, vec!["8.0.2", "7.6"]);
        assert_eq!(candidate.current_version.as_deref(), Some("8.0.2"));
    }
}
