use thiserror::Error;

#[derive(Error, Debug)]
pub enum RatesError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Upstream rejected the API token")]
    InvalidToken,

    #[error("Upstream rate limit exceeded")]
    TooManyRequests,

    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Unknown rates platform: {platform}")]
    UnknownPlatform { platform: String },

    #[error("Unsupported product type: {product_type}")]
    UnsupportedProduct { product_type: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Authentication,
    Network,
    Upstream,
    Data,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RatesError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. }
            | Self::UnknownPlatform { .. } => ErrorCategory::Configuration,
            Self::InvalidToken => ErrorCategory::Authentication,
            Self::ApiError(_) => ErrorCategory::Network,
            Self::TooManyRequests | Self::Upstream { .. } => ErrorCategory::Upstream,
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::UnsupportedProduct { .. }
            | Self::ProcessingError { .. }
            | Self::ValidationError { .. } => ErrorCategory::Data,
            Self::ZipError(_) | Self::IoError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // transient: a later run may succeed unchanged
            Self::TooManyRequests | Self::ApiError(_) => ErrorSeverity::Medium,
            Self::Upstream { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            Self::IoError(_) | Self::ZipError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// True when retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the [okargo] and [output] sections of the configuration file"
            }
            ErrorCategory::Authentication => "Renew the Okargo API token and update the configuration",
            ErrorCategory::Network => "Check network connectivity and the configured endpoint",
            ErrorCategory::Upstream => match self {
                Self::TooManyRequests => "Wait before sending more requests to the aggregator",
                _ => "Retry later; the aggregator reported an error",
            },
            ErrorCategory::Data => "Check the requested products, ports and dates",
            ErrorCategory::Storage => "Check that the output path exists and is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidToken => "The rates provider rejected the API token".to_string(),
            Self::TooManyRequests => "Too many requests were sent to the rates provider".to_string(),
            Self::Upstream { status, .. } => {
                format!("The rates provider failed with HTTP status {}", status)
            }
            Self::UnknownPlatform { platform } => {
                format!("Platform '{}' is not configured", platform)
            }
            Self::UnsupportedProduct { product_type } => {
                format!("Product type '{}' is not supported", product_type)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RatesError>;
