//! Health check operations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ConciergeClient;
use crate::error::Result;

/// Server status from `/healthz`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub cloud: String,
    pub storage: String,
    pub cache_entries: usize,
    pub agent_configured: bool,
}

/// One connectivity probe from `/api/debug`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status: String,
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

/// Connectivity probes from `/api/debug`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DebugReport {
    pub request_id: String,
    pub tests: BTreeMap<String, ProbeResult>,
}

impl ConciergeClient {
    /// Get server status.
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self.client.get(self.url("/healthz")).send().await?;
        self.handle_response(response, "health").await
    }

    /// Run the server's connectivity probes.
    pub async fn probes(&self) -> Result<DebugReport> {
        let response = self.client.get(self.url("/api/debug")).send().await?;
        self.handle_response(response, "debug").await
    }
}
