//! Chat endpoints: a single JSON reply, or the same reply streamed as SSE.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use serde_json::json;

use concierge_core::chat::{chunk_words, ChatRequest, ChatResponse, DEFAULT_CHUNK_WORDS};

use super::{request_audit, AppError};
use crate::{chat, state::AppState};

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let request = request.validate()?;
    let audit = request_audit();

    let reply = chat::respond(&state, &audit, &request).await;
    tracing::info!(
        request_id = audit.request_id(),
        session_id = %reply.session_id,
        simulated = chat::is_simulated(&reply),
        "Chat turn completed"
    );

    Ok(Json(ChatResponse::new(audit.request_id(), reply)))
}

/// POST /api/chat/stream
///
/// Emits `chunk` events with a few words each, then `done` with the full
/// response payload. Shutdown or a serialization failure emits `error`.
pub async fn chat_stream(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    let request = request.validate()?;
    let audit = request_audit();
    let mut shutdown_rx = state.subscribe_shutdown();

    let stream = async_stream::stream! {
        let reply = chat::respond(&state, &audit, &request).await;
        let delay = state.config.stream_chunk_delay();
        let mut interrupted = false;

        for chunk in chunk_words(&reply.response, DEFAULT_CHUNK_WORDS) {
            yield Ok(Event::default()
                .event("chunk")
                .data(json!({ "content": chunk }).to_string()));

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown_rx.recv() => {
                    tracing::info!("Chat stream received shutdown signal");
                    interrupted = true;
                }
            }
            if interrupted {
                break;
            }
        }

        if interrupted {
            yield Ok(error_event("Server is shutting down"));
        } else {
            let session_id = reply.session_id.clone();
            match serde_json::to_string(&ChatResponse::new(audit.request_id(), reply)) {
                Ok(payload) => {
                    tracing::info!(
                        request_id = audit.request_id(),
                        %session_id,
                        "Chat stream completed"
                    );
                    yield Ok(Event::default().event("done").data(payload));
                }
                Err(err) => {
                    tracing::error!(error = %err, "Failed to serialize chat response");
                    yield Ok(error_event("Failed to encode the response"));
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn error_event(message: &str) -> Event {
    Event::default()
        .event("error")
        .data(json!({ "error": message }).to_string())
}
