use thiserror::Error;

use crate::cloud::CloudError;

/// Errors raised while running a concierge tool.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
    #[error(transparent)]
    Cloud(#[from] CloudError),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let error = ToolError::InvalidInput("days must be between 1 and 30".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid input: days must be between 1 and 30"
        );
    }

    #[test]
    fn test_missing_parameter_display() {
        let error = ToolError::MissingParameter("resource_id".to_string());
        assert_eq!(error.to_string(), "Missing required parameter: resource_id");
    }

    #[test]
    fn test_cloud_error_is_transparent() {
        let error: ToolError = CloudError::Throttling {
            service: "ce".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Request to ce was throttled");
    }
}
