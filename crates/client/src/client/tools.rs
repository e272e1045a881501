//! Tool operations.

use serde_json::Value;

use concierge_core::agent::ToolResponse;
use concierge_core::tool::Operation;

use super::ConciergeClient;
use crate::error::Result;

impl ConciergeClient {
    /// Run a tool with a JSON object of parameters.
    pub async fn run_tool(&self, operation: Operation, params: &Value) -> Result<ToolResponse> {
        let response = self
            .client
            .post(self.url(&format!("/api{}", operation.api_path())))
            .json(params)
            .send()
            .await?;
        self.handle_response(response, operation.name()).await
    }
}
