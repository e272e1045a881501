//! One chat turn: ask the Bedrock agent, fall back to a canned reply, record
//! the exchange.

use chrono::{DateTime, Utc};

use concierge_core::chat::{
    fallback_reason, fallback_reply, simulated_model, ChatReply, ChatRole, ChatTrace, ReplySource,
    Topic, ValidChatRequest,
};
use concierge_core::cloud::AgentInvocation;
use concierge_core::session::{ChatSession, MessageRecord, RepositoryError};
use concierge_core::tool::ToolParams;

use crate::audit::AuditLog;
use crate::state::AppState;
use crate::tools;

const TIMEOUT_REASON: &str = "Agent request timed out";

/// Produces the reply for a validated request. Never fails: any agent problem
/// turns into a simulated reply, and storage problems are only logged.
pub async fn respond(state: &AppState, audit: &AuditLog, request: &ValidChatRequest) -> ChatReply {
    let received_at = Utc::now();
    let invocation = AgentInvocation {
        session_id: request.session_id.clone(),
        input: request.message.clone(),
    };

    let outcome = tokio::time::timeout(
        state.config.agent_timeout(),
        state.cloud.agent.invoke(&invocation),
    )
    .await;

    let reply = match outcome {
        Ok(Ok(reply)) => {
            tracing::info!(
                session_id = %request.session_id,
                trace_events = reply.trace_events,
                citations = reply.citations.len(),
                "Agent replied"
            );
            ChatReply {
                response: reply.text,
                session_id: request.session_id.clone(),
                citations: reply.citations,
                trace: ChatTrace::agent(reply.trace_events),
                model: state.config.model_id.clone(),
                timestamp: Utc::now(),
            }
        }
        Ok(Err(err)) => {
            let reason = fallback_reason(&err);
            tracing::warn!(
                session_id = %request.session_id,
                error = %err,
                reason,
                "Agent failed, using fallback"
            );
            fallback(state, audit, request, reason).await
        }
        Err(_) => {
            tracing::warn!(
                session_id = %request.session_id,
                timeout_secs = state.config.agent_timeout_seconds,
                "Agent timed out, using fallback"
            );
            fallback(state, audit, request, TIMEOUT_REASON).await
        }
    };

    record_exchange(state, request, received_at, &reply).await;
    reply
}

async fn fallback(
    state: &AppState,
    audit: &AuditLog,
    request: &ValidChatRequest,
    reason: &str,
) -> ChatReply {
    let topic = Topic::classify(&request.message);

    let cost = if topic == Topic::Cost {
        match tools::cost_analysis(&state.cloud, audit, &ToolParams::new()).await {
            Ok(report) => Some(report),
            Err(err) => {
                tracing::warn!(error = %err, "Live cost summary unavailable");
                None
            }
        }
    } else {
        None
    };

    ChatReply {
        response: fallback_reply(topic, cost.as_ref()),
        session_id: request.session_id.clone(),
        citations: Vec::new(),
        trace: ChatTrace::fallback(reason),
        model: simulated_model(&state.config.model_id),
        timestamp: Utc::now(),
    }
}

/// Stores the session and both messages. Failures are logged and swallowed.
async fn record_exchange(
    state: &AppState,
    request: &ValidChatRequest,
    received_at: DateTime<Utc>,
    reply: &ChatReply,
) {
    if let Err(err) = try_record_exchange(state, request, received_at, reply).await {
        tracing::warn!(
            session_id = %request.session_id,
            error = %err,
            "Failed to record chat exchange"
        );
    }
}

async fn try_record_exchange(
    state: &AppState,
    request: &ValidChatRequest,
    received_at: DateTime<Utc>,
    reply: &ChatReply,
) -> Result<(), RepositoryError> {
    let ttl_days = state.config.session_ttl_days;

    if state.sessions.get_session(&request.session_id).await?.is_none() {
        let session = ChatSession::new(&request.session_id, received_at, ttl_days);
        match state.sessions.create_session(&session).await {
            Ok(()) | Err(RepositoryError::AlreadyExists { .. }) => {}
            Err(err) => return Err(err),
        }
    }

    let user = MessageRecord::new(
        &request.session_id,
        ChatRole::User,
        &request.message,
        received_at,
        ttl_days,
    );
    state.sessions.append_message(&user).await?;

    let source = reply.source();
    let assistant = MessageRecord::new(
        &request.session_id,
        ChatRole::Assistant,
        &reply.response,
        reply.timestamp,
        ttl_days,
    )
    .with_source(source);
    state.sessions.append_message(&assistant).await?;

    tracing::debug!(
        session_id = %request.session_id,
        source = source.as_str(),
        "Recorded chat exchange"
    );
    Ok(())
}

/// Whether a reply came from the simulated path.
pub fn is_simulated(reply: &ChatReply) -> bool {
    reply.source() == ReplySource::Fallback
}
