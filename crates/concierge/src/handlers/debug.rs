//! Connectivity probes against every backend the concierge depends on.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use concierge_core::cloud::AgentInvocation;
use concierge_core::cost::{cost_window, CostQuery, Granularity, GroupBy, TimePeriod};

use super::request_audit;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeStatus {
    Success,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl ProbeResult {
    fn success(details: Value) -> Self {
        Self {
            status: ProbeStatus::Success,
            details: into_map(details),
        }
    }

    fn failed(error: impl std::fmt::Display) -> Self {
        Self {
            status: ProbeStatus::Failed,
            details: BTreeMap::from([("error".to_string(), Value::String(error.to_string()))]),
        }
    }
}

fn into_map(value: Value) -> BTreeMap<String, Value> {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    }
}

#[derive(Debug, Serialize)]
pub struct DebugReport {
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    pub tests: BTreeMap<&'static str, ProbeResult>,
}

/// GET /api/debug - Runs every probe concurrently. Always 200; failures are
/// reported per probe.
pub async fn debug(State(state): State<AppState>) -> Json<DebugReport> {
    let audit = request_audit();
    let request_id = audit.request_id().to_string();

    let (credentials, agent, cost, ec2, sessions) = tokio::join!(
        probe_credentials(&state),
        probe_agent(&state, &request_id),
        probe_cost_explorer(&state),
        probe_ec2(&state),
        probe_session_store(&state),
    );

    let tests = BTreeMap::from([
        ("aws_credentials", credentials),
        ("bedrock_agent_invoke", agent),
        ("cost_explorer", cost),
        ("ec2_access", ec2),
        ("session_store", sessions),
    ]);

    let failed: Vec<&str> = tests
        .iter()
        .filter(|(_, probe)| probe.status == ProbeStatus::Failed)
        .map(|(name, _)| *name)
        .collect();
    tracing::info!(%request_id, ?failed, "Debug probes finished");

    Json(DebugReport {
        timestamp: Utc::now(),
        request_id,
        tests,
    })
}

async fn probe_credentials(state: &AppState) -> ProbeResult {
    match state.cloud.identity.caller_identity().await {
        Ok(identity) => ProbeResult::success(json!({
            "account_id": identity.account,
            "user_arn": identity.arn,
        })),
        Err(err) => ProbeResult::failed(err),
    }
}

async fn probe_agent(state: &AppState, request_id: &str) -> ProbeResult {
    let invocation = AgentInvocation {
        session_id: format!("debug-{request_id}"),
        input: "Hello, this is a debug test".to_string(),
    };

    match tokio::time::timeout(
        state.config.agent_timeout(),
        state.cloud.agent.invoke(&invocation),
    )
    .await
    {
        Ok(Ok(reply)) => ProbeResult::success(json!({
            "response_chars": reply.text.chars().count(),
            "trace_events": reply.trace_events,
        })),
        Ok(Err(err)) => {
            let mut result = ProbeResult::failed(&err);
            result
                .details
                .insert("error_type".to_string(), Value::String(err.code().to_string()));
            result
        }
        Err(_) => ProbeResult::failed("Agent request timed out"),
    }
}

async fn probe_cost_explorer(state: &AppState) -> ProbeResult {
    let today = Utc::now().date_naive();
    let window = match cost_window(TimePeriod::Daily, Granularity::Daily, today) {
        Ok(window) => window,
        Err(err) => return ProbeResult::failed(err),
    };

    match state
        .cloud
        .cost
        .cost_and_usage(&CostQuery::new(&window, GroupBy::Service))
        .await
    {
        Ok(periods) => ProbeResult::success(json!({ "results_count": periods.len() })),
        Err(err) => ProbeResult::failed(err),
    }
}

async fn probe_ec2(state: &AppState) -> ProbeResult {
    match state.cloud.compute.instances(&state.config.region, None).await {
        Ok(instances) => ProbeResult::success(json!({
            "region": state.config.region,
            "instance_count": instances.len(),
        })),
        Err(err) => ProbeResult::failed(err),
    }
}

async fn probe_session_store(state: &AppState) -> ProbeResult {
    match state.sessions.get_session("debug-probe").await {
        Ok(_) => ProbeResult::success(json!({ "backend": state.storage_backend })),
        Err(err) => ProbeResult::failed(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_probes() {
        let Json(report) = debug(State(AppState::default())).await;

        assert_eq!(report.tests.len(), 5);
        assert_eq!(report.tests["aws_credentials"].status, ProbeStatus::Success);
        assert_eq!(report.tests["ec2_access"].status, ProbeStatus::Success);
        assert_eq!(report.tests["session_store"].status, ProbeStatus::Success);
        // The demo account has no agent.
        let agent = &report.tests["bedrock_agent_invoke"];
        assert_eq!(agent.status, ProbeStatus::Failed);
        assert_eq!(agent.details["error_type"], "NotConfigured");
    }

    #[test]
    fn test_probe_serializes_flat() {
        let probe = ProbeResult::success(json!({ "results_count": 2 }));
        let value = serde_json::to_value(&probe).unwrap();
        assert_eq!(value, json!({ "status": "SUCCESS", "results_count": 2 }));
    }
}
