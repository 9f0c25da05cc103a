use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Invalid item: {message}")]
    InvalidItem { message: String },

    #[error("Transport failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Provider fault {code}: {message}")]
    ProviderFault { code: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Network,
    Provider,
    Configuration,
    Internal,
}

impl GatewayError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn invalid_item(message: impl Into<String>) -> Self {
        Self::InvalidItem {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// The bare message without the category prefix, as the provider-facing
    /// validation rules phrase it.
    pub fn message(&self) -> String {
        match self {
            Self::InvalidRequest { message }
            | Self::InvalidItem { message }
            | Self::InvalidResponse { message }
            | Self::ConfigError { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRequest { .. } | Self::InvalidItem { .. } => ErrorCategory::Validation,
            Self::TransportError(_) => ErrorCategory::Network,
            Self::ProviderFault { .. } | Self::InvalidResponse { .. } => ErrorCategory::Provider,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::SerializationError(_) | Self::IoError(_) => ErrorCategory::Internal,
        }
    }

    /// Validation errors are raised before anything reaches the network.
    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Check the request parameters and embedded items",
            ErrorCategory::Network => "Check connectivity to the billing endpoint and retry",
            ErrorCategory::Provider => "Inspect the provider reply; the call may need support follow-up",
            ErrorCategory::Configuration => "Fix the gateway configuration file or flags",
            ErrorCategory::Internal => "Re-run with --verbose and report the failure",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => format!("Request rejected before sending: {}", self.message()),
            ErrorCategory::Network => format!("Could not reach the billing provider: {}", self),
            ErrorCategory::Provider => format!("The billing provider returned an error: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Internal => format!("Unexpected failure: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_categorized() {
        let err = GatewayError::invalid_request("The amount parameter is required");
        assert!(err.is_validation());
        assert_eq!(err.message(), "The amount parameter is required");
        assert_eq!(err.to_string(), "Invalid request: The amount parameter is required");

        let err = GatewayError::invalid_item("Item requires sku.");
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_provider_fault_is_not_validation() {
        let err = GatewayError::ProviderFault {
            code: 503,
            message: "unavailable".to_string(),
        };
        assert!(!err.is_validation());
        assert_eq!(err.category(), ErrorCategory::Provider);
        assert!(err.user_friendly_message().contains("503"));
    }
}
