//! Chat conversation state as a pure reducer.
//!
//! Clients feed [`ChatAction`]s through [`reduce`] and render the resulting
//! [`ChatState`]. Actions that are not valid in the current phase return the
//! state unchanged.

use serde::{Deserialize, Serialize};

use super::types::{new_session_id, ChatMessage, ChatRole};

/// Words per streamed chunk.
pub const DEFAULT_CHUNK_WORDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatPhase {
    Idle,
    Sending,
    Streaming,
    Done,
    Error,
}

impl ChatPhase {
    /// A request is in flight.
    pub fn is_active(&self) -> bool {
        matches!(self, ChatPhase::Sending | ChatPhase::Streaming)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub phase: ChatPhase,
    pub session_id: String,
    pub error: Option<String>,
}

impl ChatState {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            phase: ChatPhase::Idle,
            session_id: session_id.into(),
            error: None,
        }
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new(new_session_id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    AddMessage(ChatMessage),
    UpdateMessage {
        id: String,
        content: String,
        streaming: bool,
    },
    SendStarted,
    StreamChunk(String),
    StreamFinished,
    Failed(String),
    /// Drops the conversation and starts a new session.
    ClearMessages,
    SetSessionId(String),
    Reset,
}

/// Applies an action to the state.
pub fn reduce(state: &ChatState, action: ChatAction) -> ChatState {
    match action {
        ChatAction::AddMessage(message) => {
            if state.messages.iter().any(|m| m.id == message.id) {
                return state.clone();
            }
            let mut next = state.clone();
            next.messages.push(message);
            next
        }

        ChatAction::UpdateMessage {
            id,
            content,
            streaming,
        } => {
            let mut next = state.clone();
            match next.messages.iter_mut().find(|m| m.id == id) {
                Some(message) => {
                    message.content = content;
                    message.streaming = streaming;
                    next
                }
                None => state.clone(),
            }
        }

        ChatAction::SendStarted => {
            if state.phase.is_active() {
                return state.clone();
            }
            ChatState {
                phase: ChatPhase::Sending,
                error: None,
                ..state.clone()
            }
        }

        ChatAction::StreamChunk(chunk) => match state.phase {
            ChatPhase::Sending => {
                let mut next = state.clone();
                next.messages
                    .push(ChatMessage::new(ChatRole::Assistant, chunk).streaming());
                next.phase = ChatPhase::Streaming;
                next
            }
            ChatPhase::Streaming => {
                let mut next = state.clone();
                match next.messages.iter_mut().rev().find(|m| m.streaming) {
                    Some(message) => message.content.push_str(&chunk),
                    None => next
                        .messages
                        .push(ChatMessage::new(ChatRole::Assistant, chunk).streaming()),
                }
                next
            }
            _ => state.clone(),
        },

        ChatAction::StreamFinished => {
            if !state.phase.is_active() {
                return state.clone();
            }
            let mut next = state.clone();
            finish_streaming(&mut next.messages);
            next.phase = ChatPhase::Done;
            next
        }

        ChatAction::Failed(reason) => {
            if !state.phase.is_active() {
                return state.clone();
            }
            let mut next = state.clone();
            finish_streaming(&mut next.messages);
            next.phase = ChatPhase::Error;
            next.error = Some(reason);
            next
        }

        ChatAction::ClearMessages => {
            if state.phase.is_active() {
                return state.clone();
            }
            ChatState::default()
        }

        ChatAction::SetSessionId(session_id) => ChatState {
            session_id,
            ..state.clone()
        },

        ChatAction::Reset => ChatState::default(),
    }
}

fn finish_streaming(messages: &mut [ChatMessage]) {
    for message in messages.iter_mut().filter(|m| m.streaming) {
        message.streaming = false;
    }
}

/// Splits text into groups of `words` words. Concatenating the groups
/// gives back the original text.
pub fn chunk_words(text: &str, words: usize) -> Vec<String> {
    let words = words.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for token in text.split_inclusive(char::is_whitespace) {
        current.push_str(token);
        if !token.trim().is_empty() {
            count += 1;
        }
        if count == words && token.ends_with(char::is_whitespace) {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sending() -> ChatState {
        reduce(&ChatState::new("s-1"), ChatAction::SendStarted)
    }

    #[test]
    fn test_send_started_from_idle() {
        let state = sending();
        assert_eq!(state.phase, ChatPhase::Sending);
        assert_eq!(state.session_id, "s-1");
    }

    #[test]
    fn test_send_started_ignored_while_active() {
        let state = sending();
        assert_eq!(reduce(&state, ChatAction::SendStarted), state);
    }

    #[test]
    fn test_stream_chunks_build_one_message() {
        let state = reduce(&sending(), ChatAction::StreamChunk("Hello ".to_string()));
        assert_eq!(state.phase, ChatPhase::Streaming);
        let state = reduce(&state, ChatAction::StreamChunk("world".to_string()));
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].content, "Hello world");
        assert!(state.messages[0].streaming);
        assert_eq!(state.messages[0].role, ChatRole::Assistant);

        let state = reduce(&state, ChatAction::StreamFinished);
        assert_eq!(state.phase, ChatPhase::Done);
        assert!(!state.messages[0].streaming);
    }

    #[test]
    fn test_chunk_ignored_when_idle() {
        let state = ChatState::new("s-1");
        assert_eq!(
            reduce(&state, ChatAction::StreamChunk("x".to_string())),
            state
        );
    }

    #[test]
    fn test_finish_from_sending_without_chunks() {
        let state = reduce(&sending(), ChatAction::StreamFinished);
        assert_eq!(state.phase, ChatPhase::Done);
        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_failed_only_from_active_phase() {
        let state = reduce(&sending(), ChatAction::Failed("timeout".to_string()));
        assert_eq!(state.phase, ChatPhase::Error);
        assert_eq!(state.error.as_deref(), Some("timeout"));

        let idle = ChatState::new("s-1");
        assert_eq!(reduce(&idle, ChatAction::Failed("x".to_string())), idle);

        let retry = reduce(&state, ChatAction::SendStarted);
        assert_eq!(retry.phase, ChatPhase::Sending);
        assert_eq!(retry.error, None);
    }

    #[test]
    fn test_add_and_update_message() {
        let message = ChatMessage::new(ChatRole::User, "hi").with_id("m-1");
        let state = reduce(&ChatState::new("s-1"), ChatAction::AddMessage(message.clone()));
        assert_eq!(state.messages.len(), 1);
        assert_eq!(reduce(&state, ChatAction::AddMessage(message)), state);

        let updated = reduce(
            &state,
            ChatAction::UpdateMessage {
                id: "m-1".to_string(),
                content: "hello".to_string(),
                streaming: false,
            },
        );
        assert_eq!(updated.messages[0].content, "hello");

        let unknown = ChatAction::UpdateMessage {
            id: "nope".to_string(),
            content: String::new(),
            streaming: false,
        };
        assert_eq!(reduce(&state, unknown), state);
    }

    #[test]
    fn test_clear_messages_starts_new_session() {
        let message = ChatMessage::new(ChatRole::User, "hi");
        let state = reduce(&ChatState::new("s-1"), ChatAction::AddMessage(message));
        let cleared = reduce(&state, ChatAction::ClearMessages);
        assert!(cleared.messages.is_empty());
        assert_ne!(cleared.session_id, "s-1");
        assert!(cleared.session_id.starts_with("session-"));

        let busy = sending();
        assert_eq!(reduce(&busy, ChatAction::ClearMessages), busy);
    }

    #[test]
    fn test_set_session_id_and_reset() {
        let state = reduce(&sending(), ChatAction::SetSessionId("s-2".to_string()));
        assert_eq!(state.session_id, "s-2");
        assert_eq!(state.phase, ChatPhase::Sending);

        let reset = reduce(&state, ChatAction::Reset);
        assert_eq!(reset.phase, ChatPhase::Idle);
        assert_ne!(reset.session_id, "s-2");
    }

    #[test]
    fn test_chunk_words_preserves_text() {
        let text = "Your total spend this month is $42.10 across 3 services.";
        let chunks = chunk_words(text, 4);
        assert_eq!(chunks.concat(), text);
        assert_eq!(chunks[0], "Your total spend this ");
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn test_chunk_words_edge_cases() {
        assert!(chunk_words("", 4).is_empty());
        assert_eq!(chunk_words("one", 0), vec!["one".to_string()]);
        let text = "line one\n\nline two";
        assert_eq!(chunk_words(text, 2).concat(), text);
    }
}
