use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use concierge_core::agent::{
    classify_error, tool_error_to_status_code, ErrorInfo, ResponseMetadata, ToolResponse,
};
use concierge_core::chat::ChatError;
use concierge_core::session::{repository_error_to_status_code, RepositoryError};
use concierge_core::tool::ToolError;

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_and_info(&self) -> (u16, ErrorInfo) {
        if let Some(tool_error) = self.0.downcast_ref::<ToolError>() {
            (
                tool_error_to_status_code(tool_error),
                classify_error(tool_error),
            )
        } else if let Some(chat_error) = self.0.downcast_ref::<ChatError>() {
            (400, ErrorInfo::new("ValidationError", chat_error.to_string()))
        } else if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            let error_type = match repo_error {
                RepositoryError::NotFound { .. } => "NotFound",
                RepositoryError::AlreadyExists { .. } => "Conflict",
                RepositoryError::ConnectionFailed(_) => "ServiceUnavailable",
                RepositoryError::QueryFailed(_) | RepositoryError::InvalidData(_) => {
                    "StorageError"
                }
            };
            (code, ErrorInfo::new(error_type, repo_error.to_string()))
        } else {
            (
                500,
                ErrorInfo::new("InternalError", "An unexpected error occurred"),
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, info) = self.status_and_info();
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, status = code, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = code, "Request rejected");
        }

        let metadata = ResponseMetadata::new(Uuid::new_v4().to_string(), Utc::now());
        (status, Json(ToolResponse::failure(None, info, metadata))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::cloud::CloudError;

    #[test]
    fn test_tool_errors_use_tool_status() {
        let err = AppError::from(ToolError::MissingParameter("resource_id".to_string()));
        let (code, info) = err.status_and_info();
        assert_eq!(code, 400);
        assert_eq!(info.message, "Missing required parameter: resource_id");

        let denied = AppError::from(ToolError::Cloud(CloudError::AccessDenied {
            service: "ec2".to_string(),
            message: "no".to_string(),
        }));
        assert_eq!(denied.status_and_info().0, 403);
    }

    #[test]
    fn test_empty_chat_message_is_400() {
        let (code, info) = AppError::from(ChatError::EmptyMessage).status_and_info();
        assert_eq!(code, 400);
        assert_eq!(info.message, "Message cannot be empty");
    }

    #[test]
    fn test_missing_session_is_404() {
        let err = AppError::from(RepositoryError::NotFound {
            entity_type: "ChatSession",
            id: "session-1".to_string(),
        });
        let (code, info) = err.status_and_info();
        assert_eq!(code, 404);
        assert_eq!(info.error_type, "NotFound");
    }

    #[test]
    fn test_other_errors_hide_details() {
        let (code, info) = AppError(anyhow::anyhow!("disk on fire")).status_and_info();
        assert_eq!(code, 500);
        assert!(!info.message.contains("disk"));
    }
}
