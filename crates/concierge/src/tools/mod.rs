//! Tool orchestration.
//!
//! `run` resolves one operation against the cloud providers and returns its
//! JSON result, going through the result cache for Cost Explorer backed
//! operations. `execute` wraps `run` with the audit trail and the
//! `{success, operation, data, metadata}` envelope shared by the REST API and
//! the action group.

mod cost;
mod inventory;
mod security;

use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use concierge_core::agent::{
    classify_error, tool_error_to_status_code, ResponseMetadata, ToolResponse,
};
use concierge_core::audit::{AuditEvent, EventSource};
use concierge_core::cache::{deserialize_value, serialize_value, tool_key};
use concierge_core::tool::{Operation, ToolError, ToolParams};

use crate::audit::AuditLog;
use crate::state::AppState;

pub use cost::cost_analysis;

/// Runs an operation, serving cacheable results from the cache.
pub async fn run(
    state: &AppState,
    audit: &AuditLog,
    operation: Operation,
    params: &ToolParams,
) -> Result<Value, ToolError> {
    let key = tool_key(operation, params);

    if operation.is_cacheable() {
        match state.cache.get(&key).await {
            Ok(Some(bytes)) => match deserialize_value::<Value>(&bytes) {
                Ok(value) => {
                    tracing::debug!(%key, "Tool result served from cache");
                    return Ok(value);
                }
                Err(err) => {
                    tracing::warn!(%key, error = %err, "Discarding unreadable cache entry");
                    if let Err(err) = state.cache.delete(&key).await {
                        tracing::warn!(%key, error = %err, "Cache delete failed");
                    }
                }
            },
            Ok(None) => {}
            Err(err) => tracing::warn!(%key, error = %err, "Cache read failed"),
        }
    }

    let value = dispatch(state, audit, operation, params).await?;

    if operation.is_cacheable() {
        let stored = match serialize_value(&value) {
            Ok(bytes) => state
                .cache
                .set(&key, &bytes, Some(state.config.cache_ttl()))
                .await,
            Err(err) => Err(err),
        };
        if let Err(err) = stored {
            tracing::warn!(%key, error = %err, "Cache write failed");
        }
    }

    Ok(value)
}

async fn dispatch(
    state: &AppState,
    audit: &AuditLog,
    operation: Operation,
    params: &ToolParams,
) -> Result<Value, ToolError> {
    let cloud = &state.cloud;
    let region = params.get_or("region", &state.config.region);

    match operation {
        Operation::CostAnalysis => to_json(&cost::cost_analysis(cloud, audit, params).await?),
        Operation::IdleResources => {
            to_json(&cost::idle_resources(cloud, audit, region, params).await?)
        }
        Operation::CostOptimization => {
            to_json(&cost::cost_optimization(cloud, audit, region, params).await?)
        }
        Operation::ResourceInventory => {
            to_json(&inventory::resource_inventory(cloud, audit, region, params).await?)
        }
        Operation::ResourceDetails => {
            to_json(&inventory::resource_details(cloud, audit, region, params).await?)
        }
        Operation::ResourceHealth => {
            to_json(&inventory::resource_health(cloud, audit, region, params).await?)
        }
        Operation::SecurityAssessment => {
            to_json(&security::security_assessment(cloud, audit, region, params).await?)
        }
        Operation::EncryptionStatus => {
            to_json(&security::encryption_status(cloud, audit, region, params).await?)
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::Internal(e.to_string()))
}

/// Runs an operation with auditing and wraps the outcome in a tool response.
///
/// Returns the HTTP status to use alongside the response body.
pub async fn execute(
    state: &AppState,
    audit: &AuditLog,
    source: EventSource,
    operation: Operation,
    params: &ToolParams,
) -> (u16, ToolResponse) {
    let started = Instant::now();
    let name = operation.name();
    audit.record(AuditEvent::request_received(source, name, params));

    let result = run(state, audit, operation, params).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    audit.record(AuditEvent::tool_invocation(
        name,
        params,
        elapsed_ms,
        result.is_ok(),
    ));

    let (status, response) = match result {
        Ok(data) => (
            200,
            ToolResponse::success(
                name,
                data,
                ResponseMetadata::new(audit.request_id(), Utc::now()),
            ),
        ),
        Err(err) => failure(audit, Some(name), &err),
    };

    let bytes = serde_json::to_vec(&response).map(|b| b.len()).unwrap_or(0);
    audit.record(AuditEvent::response_sent(
        name,
        bytes,
        started.elapsed().as_secs_f64() * 1000.0,
        response.success,
    ));

    (status, response)
}

/// Classifies a tool error, records it and builds the failure envelope.
pub fn failure(audit: &AuditLog, operation: Option<&str>, err: &ToolError) -> (u16, ToolResponse) {
    let info = classify_error(err);
    let status = tool_error_to_status_code(err);
    let name = operation.unwrap_or("unknown");

    tracing::warn!(operation = name, status, error = %err, "Tool failed");
    audit.record(AuditEvent::error_occurred(
        &info.error_type,
        Some(&info.error_type),
        name,
        info.severity,
        &info.message,
    ));

    let metadata = ResponseMetadata::new(audit.request_id(), Utc::now());
    (
        status,
        ToolResponse::failure(operation.map(str::to_string), info, metadata),
    )
}
