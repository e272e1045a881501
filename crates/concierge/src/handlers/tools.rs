//! REST endpoints for the concierge tools, one per operation.
//!
//! Each takes an optional JSON object of parameters and replies with the
//! `{success, operation, data, metadata}` envelope.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use concierge_core::audit::EventSource;
use concierge_core::tool::{Operation, ToolError, ToolParams};

use super::{request_audit, AppError};
use crate::{state::AppState, tools};

/// Parses a request body into tool parameters. An empty body means no parameters.
fn parse_params(body: &Bytes) -> Result<ToolParams, ToolError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ToolParams::new());
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ToolError::InvalidInput(format!("request body is not valid JSON: {e}")))?;
    ToolParams::from_json(&value)
}

async fn invoke(state: AppState, operation: Operation, body: Bytes) -> Result<Response, AppError> {
    let params = parse_params(&body)?;
    let audit = request_audit();

    let (status, response) =
        tools::execute(&state, &audit, EventSource::Api, operation, &params).await;
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    Ok((status, Json(response)).into_response())
}

/// POST /api/cost-analysis
pub async fn cost_analysis(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    invoke(state, Operation::CostAnalysis, body).await
}

/// POST /api/idle-resources
pub async fn idle_resources(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    invoke(state, Operation::IdleResources, body).await
}

/// POST /api/cost-optimization
pub async fn cost_optimization(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    invoke(state, Operation::CostOptimization, body).await
}

/// POST /api/resource-inventory
pub async fn resource_inventory(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    invoke(state, Operation::ResourceInventory, body).await
}

/// POST /api/resource-details
pub async fn resource_details(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    invoke(state, Operation::ResourceDetails, body).await
}

/// POST /api/resource-health
pub async fn resource_health(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    invoke(state, Operation::ResourceHealth, body).await
}

/// POST /api/security-assessment
pub async fn security_assessment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    invoke(state, Operation::SecurityAssessment, body).await
}

/// POST /api/encryption-status
pub async fn encryption_status(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    invoke(state, Operation::EncryptionStatus, body).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_params_empty_body() {
        assert!(parse_params(&Bytes::new()).unwrap().is_empty());
        assert!(parse_params(&Bytes::from_static(b"  \n")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_params_mixed_values() {
        let body = Bytes::from_static(br#"{"days": 7, "region": "eu-west-1", "deep": true}"#);
        let params = parse_params(&body).unwrap();
        assert_eq!(params.get("days"), Some("7"));
        assert_eq!(params.get("region"), Some("eu-west-1"));
        assert_eq!(params.get("deep"), Some("true"));
    }

    #[test]
    fn test_parse_params_rejects_garbage() {
        let err = parse_params(&Bytes::from_static(b"days=7")).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));

        let err = parse_params(&Bytes::from_static(b"[1, 2]")).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }
}
