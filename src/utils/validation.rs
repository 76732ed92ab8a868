use crate::utils::error::{CatalogError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CatalogError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Platform identifiers are single lowercase words such as `linuxx64`.
pub fn validate_platform(field_name: &str, platform: &str) -> Result<()> {
    validate_non_empty_string(field_name, platform)?;
    if !platform.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: platform.to_string(),
            reason: "Platform must contain only lowercase letters and digits".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api.base_url", "https://api.sdkman.io/2").is_ok());
        assert!(validate_url("api.base_url", "http://localhost:8080").is_ok());
        assert!(validate_url("api.base_url", "").is_err());
        assert!(validate_url("api.base_url", "invalid-url").is_err());
        assert!(validate_url("api.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_platform() {
        assert!(validate_platform("platform", "linuxx64").is_ok());
        assert!(validate_platform("platform", "darwinarm64").is_ok());
        assert!(validate_platform("platform", "").is_err());
        assert!(validate_platform("platform", "linux/x64").is_err());
        assert!(validate_platform("platform", "LinuxX64").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("display.width", 80, 40, 400).is_ok());
        assert!(validate_range("display.width", 20, 40, 400).is_err());
        assert!(validate_range("display.width", 401, 40, 400).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("local.candidates_dir", "/home/me/.sdkman/candidates").is_ok());
        assert!(validate_path("local.candidates_dir", "").is_err());
        assert!(validate_path("local.candidates_dir", "bad\0path").is_err());
    }
}
