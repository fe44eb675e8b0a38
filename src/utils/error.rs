use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("XML processing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Proxy returned HTTP {status}: {message}")]
    ProxyStatusError { status: u16, message: String },

    #[error("{message}")]
    UpstreamError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Input,
    Upstream,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ProxyError {
    pub fn validation(message: impl Into<String>) -> Self {
        ProxyError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ProxyError::HttpError(_) | ProxyError::ProxyStatusError { .. } => ErrorCategory::Network,
            ProxyError::XmlError(_) | ProxyError::SerializationError(_) | ProxyError::CsvError(_) => {
                ErrorCategory::Data
            }
            ProxyError::ConfigError { .. }
            | ProxyError::InvalidConfigValueError { .. }
            | ProxyError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ProxyError::ValidationError { .. } => ErrorCategory::Input,
            ProxyError::UpstreamError { .. } => ErrorCategory::Upstream,
            ProxyError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ProxyError::HttpError(e) if e.is_connect() => {
                "Could not connect to the load search proxy".to_string()
            }
            ProxyError::HttpError(e) if e.is_timeout() => "The request timed out".to_string(),
            ProxyError::ProxyStatusError { message, .. } => message.clone(),
            ProxyError::UpstreamError { message } => message.clone(),
            ProxyError::MissingConfigError { field } => {
                format!("Missing required setting: {}", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the proxy is running and reachable, then retry",
            ErrorCategory::Upstream => "Verify your TruckStop credentials and search criteria",
            ErrorCategory::Configuration => "Review the configuration file and command-line overrides",
            ErrorCategory::Input => "Adjust the search criteria and try again",
            ErrorCategory::Data => "The response could not be processed; run with --verbose for details",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err = ProxyError::validation("originState is required");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Low);

        let err = ProxyError::MissingConfigError {
            field: "truckstop.api_url".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(
            err.user_friendly_message(),
            "Missing required setting: truckstop.api_url"
        );
    }

    #[test]
    fn test_proxy_status_message_passthrough() {
        let err = ProxyError::ProxyStatusError {
            status: 400,
            message: "SOAP Fault [a:InvalidCredentials]: Login failed".to_string(),
        };
        assert_eq!(
            err.user_friendly_message(),
            "SOAP Fault [a:InvalidCredentials]: Login failed"
        );
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }
}
