use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cloud::Citation;

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::System => "system",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(ChatRole::User),
            "assistant" => Some(ChatRole::Assistant),
            "system" => Some(ChatRole::System),
            _ => None,
        }
    }
}

/// Where an assistant reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Agent,
    Fallback,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplySource::Agent => "agent",
            ReplySource::Fallback => "fallback",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "agent" => Some(ReplySource::Agent),
            "fallback" => Some(ReplySource::Fallback),
            _ => None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,
}

/// An incoming chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(
        default,
        rename = "sessionId",
        alias = "session_id",
        deserialize_with = "crate::serde::deserialize_optional_string"
    )]
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Trims the message and fills in a session id.
    pub fn validate(self) -> Result<ValidChatRequest, ChatError> {
        let message = self.message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        Ok(ValidChatRequest {
            message: message.to_string(),
            session_id: self.session_id.unwrap_or_else(new_session_id),
        })
    }
}

/// A chat request with a non-empty message and a session id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidChatRequest {
    pub message: String,
    pub session_id: String,
}

pub fn new_session_id() -> String {
    format!("session-{}", Uuid::new_v4())
}

/// What happened while producing a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTrace {
    pub source: ReplySource,
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub trace_events: usize,
}

impl ChatTrace {
    pub fn agent(trace_events: usize) -> Self {
        Self {
            source: ReplySource::Agent,
            fallback: false,
            reason: None,
            trace_events,
        }
    }

    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            source: ReplySource::Fallback,
            fallback: true,
            reason: Some(reason.into()),
            trace_events: 0,
        }
    }
}

/// The reply to a chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
    pub citations: Vec<Citation>,
    pub trace: ChatTrace,
    pub model: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatReply {
    pub fn source(&self) -> ReplySource {
        self.trace.source
    }
}

/// Metadata of a chat response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMetadata {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub model: String,
}

/// `{success, data, metadata}` as returned by the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub data: ChatReply,
    pub metadata: ChatMetadata,
}

impl ChatResponse {
    pub fn new(request_id: impl Into<String>, data: ChatReply) -> Self {
        let metadata = ChatMetadata {
            request_id: request_id.into(),
            timestamp: data.timestamp,
            model: data.model.clone(),
        };
        Self {
            success: true,
            data,
            metadata,
        }
    }
}

/// A message as held by a chat client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub streaming: bool,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            streaming: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn streaming(mut self) -> Self {
        self.streaming = true;
        self
    }
}
