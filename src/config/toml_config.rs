use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{self, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

static ENV_VAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

/// Optional on-disk configuration; every table and key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub local: LocalConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub platform: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_millis: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub candidates_dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub pager: Option<bool>,
    pub width: Option<usize>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        tracing::debug!("Loading config from {}", path.as_ref().display());
        let content = std::fs::read_to_string(&path).map_err(CatalogError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration, substituting `${VAR}` references first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// `<config_dir>/sdk-catalog/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sdk-catalog").join("config.toml"))
    }

    /// Loads the explicit path, or the default path when it exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Option<Self>> {
        match explicit {
            Some(path) => Self::from_file(path).map(Some),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(path).map(Some),
                _ => Ok(None),
            },
        }
    }

    // Unknown variables are left untouched.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_REGEX
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.api.base_url {
            validation::validate_url("api.base_url", url)?;
        }
        if let Some(platform) = &self.api.platform {
            validation::validate_platform("api.platform", platform)?;
        }
        if let Some(dir) = &self.local.candidates_dir {
            validation::validate_path("local.candidates_dir", dir)?;
        }
        if let Some(width) = self.display.width {
            validation::validate_range("display.width", width, 40, 400)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
base_url = "https://api.example.com/2"
platform = "darwinarm64"
timeout_seconds = 3
retry_attempts = 1

[local]
candidates_dir = "/opt/sdkman/candidates"

[display]
pager = false
width = 100
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api.base_url.as_deref(), Some("https://api.example.com/2"));
        assert_eq!(config.api.platform.as_deref(), Some("darwinarm64"));
        assert_eq!(config.api.retry_delay_millis, None);
        assert_eq!(config.display.pager, Some(false));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SDK_CATALOG_TEST_HOME", "/home/tester");

        let config = TomlConfig::from_toml_str(
            r#"
[local]
candidates_dir = "${SDK_CATALOG_TEST_HOME}/.sdkman/candidates"
"#,
        )
        .unwrap();
        assert_eq!(
            config.local.candidates_dir.as_deref(),
            Some("/home/tester/.sdkman/candidates")
        );

        std::env::remove_var("SDK_CATALOG_TEST_HOME");
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let bad_url = TomlConfig::from_toml_str("[api]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_width = TomlConfig::from_toml_str("[display]\nwidth = 10\n").unwrap();
        assert!(bad_width.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let err = TomlConfig::from_toml_str("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, CatalogError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[api]\nplatform = \"linuxarm64\"\n")
            .unwrap();

        let config = TomlConfig::discover(Some(temp_file.path())).unwrap().unwrap();
        assert_eq!(config.api.platform.as_deref(), Some("linuxarm64"));
    }
}
