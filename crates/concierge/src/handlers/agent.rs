//! Bedrock Agent action-group endpoint.
//!
//! The agent always expects a 200 with the envelope; the tool status travels
//! inside it as `httpStatusCode`.

use axum::{extract::State, Json};

use concierge_core::agent::{ActionGroupEvent, ActionGroupResponse};
use concierge_core::audit::EventSource;

use super::{request_audit, AppError};
use crate::{state::AppState, tools};

/// Handle an action-group event (POST /api/agent/actions).
pub async fn handle_action(
    State(state): State<AppState>,
    Json(event): Json<ActionGroupEvent>,
) -> Result<Json<ActionGroupResponse>, AppError> {
    let audit = request_audit();
    tracing::info!(
        request_id = audit.request_id(),
        action_group = %event.action_group,
        api_path = %event.api_path,
        "Action group event received"
    );

    let resolved = event
        .operation()
        .and_then(|operation| event.params().map(|params| (operation, params)));

    let (status, response) = match resolved {
        Ok((operation, params)) => {
            tools::execute(&state, &audit, EventSource::BedrockAgent, operation, &params).await
        }
        Err(err) => {
            let operation = event.operation().ok().map(|op| op.name());
            tools::failure(&audit, operation, &err)
        }
    };

    let envelope =
        ActionGroupResponse::wrap(&event, &state.config.action_group_name, status, &response)?;
    Ok(Json(envelope))
}
