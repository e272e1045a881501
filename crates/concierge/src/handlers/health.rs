//! Health check endpoints.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Backend names and cache size (no AWS calls)

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub cloud: &'static str,
    pub storage: &'static str,
    pub cache_entries: usize,
    pub agent_configured: bool,
}

/// GET /livez - Basic liveness probe.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Passive status, safe to poll often.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        cloud: state.cloud.name,
        storage: state.storage_backend,
        cache_entries: state.cache.len().await,
        agent_configured: state.config.agent_id.is_some(),
    })
}
