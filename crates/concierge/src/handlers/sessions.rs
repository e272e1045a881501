use axum::{
    extract::{Path, State},
    Json,
};

use concierge_core::session::{RepositoryError, SessionTranscript};

use super::AppError;
use crate::state::AppState;

/// Get a session with its messages (GET /api/sessions/{id}).
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionTranscript>, AppError> {
    let session = state
        .sessions
        .get_session(&session_id)
        .await?
        .ok_or_else(|| RepositoryError::NotFound {
            entity_type: "ChatSession",
            id: session_id.clone(),
        })?;
    let messages = state.sessions.list_messages(&session_id).await?;

    Ok(Json(SessionTranscript { session, messages }))
}
