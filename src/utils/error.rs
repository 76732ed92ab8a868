use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Server returned status {status} for {url}")]
    ServerError { status: u16, url: String },

    #[error("URL parsing failed: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse {what}: {message}")]
    ParseError { what: String, message: String },

    #[error("Candidate not found: {name}")]
    CandidateNotFound { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Parsing,
    FileSystem,
    Lookup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CatalogError {
    pub fn parse(what: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::ParseError {
            what: what.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::ApiError(_) | CatalogError::ServerError { .. } => ErrorCategory::Network,
            CatalogError::UrlError(_)
            | CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::MissingConfigError { .. }
            | CatalogError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CatalogError::ParseError { .. }
            | CatalogError::CsvError(_)
            | CatalogError::SerializationError(_) => ErrorCategory::Parsing,
            CatalogError::IoError(_) => ErrorCategory::FileSystem,
            CatalogError::CandidateNotFound { .. } => ErrorCategory::Lookup,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CatalogError::CandidateNotFound { .. } => ErrorSeverity::Low,
            CatalogError::ApiError(_) => ErrorSeverity::Medium,
            CatalogError::ServerError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            CatalogError::ServerError { .. }
            | CatalogError::ParseError { .. }
            | CatalogError::CsvError(_)
            | CatalogError::SerializationError(_) => ErrorSeverity::High,
            CatalogError::UrlError(_)
            | CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::MissingConfigError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Whether an HTTP attempt that failed with this error may be repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::ApiError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            CatalogError::ServerError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CatalogError::ApiError(_) => {
                "Check your network connection and the candidates API URL".to_string()
            }
            CatalogError::ServerError { status, .. } if *status >= 500 => {
                "The candidates API is having trouble, try again in a moment".to_string()
            }
            CatalogError::ServerError { .. } => {
                "Check the candidate name and the platform identifier".to_string()
            }
            CatalogError::UrlError(_) => {
                "Set --api-url or SDKMAN_CANDIDATES_API to a valid http(s) URL".to_string()
            }
            CatalogError::MissingConfigError { field } => {
                format!("Provide a value for '{}' on the command line or in the config file", field)
            }
            CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. } => {
                "Review the config file and command line flags".to_string()
            }
            CatalogError::ParseError { .. } => {
                "The API returned an unexpected layout, run with --verbose to see the raw response"
                    .to_string()
            }
            CatalogError::CandidateNotFound { .. } => {
                "Run 'sdk-catalog names' to see every candidate identifier".to_string()
            }
            CatalogError::IoError(_) => "Check file permissions and available disk space".to_string(),
            CatalogError::CsvError(_) | CatalogError::SerializationError(_) => {
                "Try a different --format".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CatalogError::ApiError(_) => "Could not reach the candidates API".to_string(),
            CatalogError::ServerError { status, .. } => {
                format!("The candidates API answered with HTTP {}", status)
            }
            CatalogError::CandidateNotFound { name } => format!("No candidate named '{}'", name),
            CatalogError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
