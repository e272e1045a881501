//! Response bodies shared by the REST API and the action-group envelope.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ErrorInfo;
use super::event::ActionGroupEvent;

pub const MESSAGE_VERSION: &str = "1.0";
pub const RESPONSE_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl ResponseMetadata {
    pub fn new(request_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            request_id: request_id.into(),
            timestamp,
            version: RESPONSE_VERSION.to_string(),
        }
    }
}

/// `{success, operation, data, metadata}` or `{success, error, metadata}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    pub metadata: ResponseMetadata,
}

impl ToolResponse {
    pub fn success(operation: impl Into<String>, data: Value, metadata: ResponseMetadata) -> Self {
        Self {
            success: true,
            operation: Some(operation.into()),
            data: Some(data),
            error: None,
            metadata,
        }
    }

    pub fn failure(
        operation: Option<String>,
        error: ErrorInfo,
        metadata: ResponseMetadata,
    ) -> Self {
        Self {
            success: false,
            operation,
            data: None,
            error: Some(error),
            metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    /// The tool response, serialized as a JSON string.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub action_group: String,
    pub api_path: String,
    pub http_method: String,
    pub http_status_code: u16,
    pub response_body: BTreeMap<String, ResponseBody>,
}

/// The envelope an action-group Lambda returns to Bedrock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGroupResponse {
    pub message_version: String,
    pub response: ActionResponse,
}

impl ActionGroupResponse {
    /// Wraps a tool response. `apiPath` echoes the request, which Bedrock requires.
    pub fn wrap(
        event: &ActionGroupEvent,
        default_action_group: &str,
        status: u16,
        response: &ToolResponse,
    ) -> serde_json::Result<Self> {
        let body = serde_json::to_string(response)?;
        let action_group = if event.action_group.is_empty() {
            default_action_group.to_string()
        } else {
            event.action_group.clone()
        };

        Ok(Self {
            message_version: MESSAGE_VERSION.to_string(),
            response: ActionResponse {
                action_group,
                api_path: event.api_path.clone(),
                http_method: event.http_method.clone(),
                http_status_code: status,
                response_body: BTreeMap::from([(
                    "application/json".to_string(),
                    ResponseBody { body },
                )]),
            },
        })
    }

    /// Parses the embedded tool response.
    pub fn tool_response(&self) -> serde_json::Result<Option<ToolResponse>> {
        self.response
            .response_body
            .get("application/json")
            .map(|body| serde_json::from_str(&body.body))
            .transpose()
    }
}
