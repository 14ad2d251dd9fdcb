use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Normalization error: {message}")]
    Normalization { message: String },

    #[error("Interpretation API error: {message}")]
    SignApi { message: String },

    #[error("Interpretation API returned status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Fallback computation error: {message}")]
    FallbackComputation { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, ChartError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Computation,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ChartError {
    pub fn normalization(message: impl Into<String>) -> Self {
        Self::Normalization {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Normalization { .. } => ErrorCategory::Input,
            Self::SignApi { .. } | Self::ApiStatus { .. } | Self::ApiError(_) => {
                ErrorCategory::Network
            }
            Self::FallbackComputation { .. } | Self::SerializationError(_) => {
                ErrorCategory::Computation
            }
            Self::IoError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 星座解析失敗可以降級處理
            ErrorCategory::Input | ErrorCategory::Computation => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::Normalization { .. } => {
                "Provide either {dateOfBirth, timeOfBirth, geo} or {day, month, year, hour, min, lat, lon}".to_string()
            }
            Self::SignApi { .. } | Self::ApiStatus { .. } | Self::ApiError(_) => {
                "Check the API endpoint, credentials and network connectivity".to_string()
            }
            Self::FallbackComputation { .. } => {
                "Check that the birth date and time are within valid ranges".to_string()
            }
            Self::IoError(_) => "Check that the output path exists and is writable".to_string(),
            Self::SerializationError(_) => "Check that the input is valid JSON".to_string(),
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Review the configuration file and command line arguments".to_string()
            }
            Self::MissingConfigError { field } => {
                format!("Set '{}' in the configuration or environment", field)
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}'", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Normalization { message } => format!("Birth data could not be read: {}", message),
            Self::SignApi { .. } | Self::ApiStatus { .. } | Self::ApiError(_) => {
                "The astrology service is unavailable".to_string()
            }
            Self::FallbackComputation { .. } => {
                "Signs could not be calculated for this birth time".to_string()
            }
            Self::IoError(e) => format!("File operation failed: {}", e),
            Self::SerializationError(e) => format!("Invalid JSON: {}", e),
            _ => format!("Configuration problem: {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_error_is_recoverable() {
        let err = ChartError::normalization("invalid birth data format");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(
            err.to_string(),
            "Normalization error: invalid birth data format"
        );
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = ChartError::MissingConfigError {
            field: "api.endpoint".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("api.endpoint"));
    }

    #[test]
    fn test_api_status_is_network_error() {
        let err = ChartError::ApiStatus {
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }
}
