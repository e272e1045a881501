//! User-facing classification of tool errors.

use serde::{Deserialize, Serialize};

use crate::cloud::CloudError;
use crate::tool::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Warning,
    Error,
}

/// What the caller is told about a failed tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub severity: ErrorSeverity,
    pub retry_suggested: bool,
    pub retry_delay_seconds: Option<u64>,
    pub action_required: Option<String>,
}

impl ErrorInfo {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: error_type.into(),
            severity: ErrorSeverity::Error,
            retry_suggested: false,
            retry_delay_seconds: None,
            action_required: None,
        }
    }

    fn retry(mut self, delay_seconds: Option<u64>) -> Self {
        self.retry_suggested = true;
        self.retry_delay_seconds = delay_seconds;
        self
    }
}

pub fn classify_error(error: &ToolError) -> ErrorInfo {
    match error {
        ToolError::InvalidInput(message) => {
            ErrorInfo::new("InvalidInput", format!("Invalid input: {message}"))
        }
        ToolError::MissingParameter(name) => ErrorInfo::new(
            "MissingParameter",
            format!("Missing required parameter: {name}"),
        ),
        ToolError::UnknownOperation(name) => {
            ErrorInfo::new("UnknownOperation", format!("Unknown operation: {name}"))
        }
        ToolError::Cloud(cloud) => classify_cloud_error(cloud),
        ToolError::Internal(_) => ErrorInfo::new(
            "InternalError",
            "Something went wrong while preparing the result. Please try again.",
        ),
    }
}

fn classify_cloud_error(error: &CloudError) -> ErrorInfo {
    let code = error.code().to_string();
    let service = error.service().unwrap_or("the AWS service").to_string();

    match error {
        CloudError::AccessDenied { .. } => {
            let mut info = ErrorInfo::new(
                code,
                format!(
                    "I don't have permission to access {service}. Please ensure the IAM role has the necessary permissions."
                ),
            );
            info.action_required = Some("Check IAM permissions".to_string());
            info
        }
        CloudError::Throttling { .. } => {
            let mut info = ErrorInfo::new(
                code,
                "AWS is currently rate limiting requests. Please try again in a few moments.",
            )
            .retry(Some(30));
            info.severity = ErrorSeverity::Warning;
            info
        }
        CloudError::ServiceUnavailable { .. } => ErrorInfo::new(
            code,
            format!(
                "{service} is temporarily unavailable. You can check AWS service status at https://status.aws.amazon.com/"
            ),
        )
        .retry(Some(300)),
        CloudError::Internal { .. } => ErrorInfo::new(
            code,
            "AWS encountered an internal error. Please try again.",
        )
        .retry(Some(60)),
        CloudError::InvalidParameter { .. } => ErrorInfo::new(
            code,
            "One of the parameters provided is invalid. Please check your request and try again.",
        ),
        CloudError::NotFound { .. } | CloudError::DataUnavailable(_) => {
            ErrorInfo::new(code, error.to_string())
        }
        CloudError::Connection { .. } => ErrorInfo::new(
            code,
            "There was a problem connecting to AWS services. Please try again.",
        )
        .retry(None),
        CloudError::NotConfigured(_) => {
            let mut info = ErrorInfo::new(code, error.to_string());
            info.action_required = Some("Check the server configuration".to_string());
            info
        }
        CloudError::Service { message, .. } => {
            ErrorInfo::new(code, format!("AWS service error: {message}"))
        }
    }
}

/// HTTP status for a tool error.
pub fn tool_error_to_status_code(error: &ToolError) -> u16 {
    match error {
        ToolError::InvalidInput(_)
        | ToolError::MissingParameter(_)
        | ToolError::UnknownOperation(_) => 400,
        ToolError::Internal(_) => 500,
        ToolError::Cloud(cloud) => match cloud {
            CloudError::AccessDenied { .. } => 403,
            CloudError::NotFound { .. } => 404,
            CloudError::Throttling { .. } => 429,
            CloudError::InvalidParameter { .. } => 400,
            CloudError::ServiceUnavailable { .. } | CloudError::NotConfigured(_) => 503,
            CloudError::Connection { .. } => 502,
            CloudError::Internal { .. }
            | CloudError::DataUnavailable(_)
            | CloudError::Service { .. } => 500,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied() {
        let error = ToolError::Cloud(CloudError::AccessDenied {
            service: "ce".to_string(),
            message: "denied".to_string(),
        });
        let info = classify_error(&error);
        assert_eq!(info.error_type, "AccessDenied");
        assert!(!info.retry_suggested);
        assert!(info.message.contains("permission to access ce"));
        assert_eq!(info.action_required.as_deref(), Some("Check IAM permissions"));
        assert_eq!(tool_error_to_status_code(&error), 403);
    }

    #[test]
    fn test_retry_delays() {
        let throttled = classify_error(&ToolError::Cloud(CloudError::Throttling {
            service: "ec2".to_string(),
        }));
        assert_eq!(throttled.severity, ErrorSeverity::Warning);
        assert_eq!(throttled.retry_delay_seconds, Some(30));

        let unavailable = classify_error(&ToolError::Cloud(CloudError::ServiceUnavailable {
            service: "ec2".to_string(),
        }));
        assert_eq!(unavailable.retry_delay_seconds, Some(300));

        let internal = classify_error(&ToolError::Cloud(CloudError::Internal {
            service: "ec2".to_string(),
        }));
        assert_eq!(internal.retry_delay_seconds, Some(60));

        let connection = classify_error(&ToolError::Cloud(CloudError::Connection {
            service: "ec2".to_string(),
            message: "dns".to_string(),
        }));
        assert!(connection.retry_suggested);
        assert_eq!(connection.retry_delay_seconds, None);
    }

    #[test]
    fn test_input_errors() {
        let invalid = ToolError::InvalidInput("days must be between 1 and 30".to_string());
        assert_eq!(
            classify_error(&invalid).message,
            "Invalid input: days must be between 1 and 30"
        );
        assert_eq!(tool_error_to_status_code(&invalid), 400);

        let missing = ToolError::MissingParameter("resource_id".to_string());
        assert_eq!(
            classify_error(&missing).message,
            "Missing required parameter: resource_id"
        );
        assert!(!classify_error(&missing).retry_suggested);
    }

    #[test]
    fn test_validation_is_not_retried() {
        let error = ToolError::Cloud(CloudError::from_code("ce", "ValidationException", "bad"));
        let info = classify_error(&error);
        assert!(!info.retry_suggested);
        assert_eq!(tool_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_serialized_shape() {
        let info = classify_error(&ToolError::UnknownOperation("x".to_string()));
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "UnknownOperation");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["retry_suggested"], false);
    }
}
