use async_trait::async_trait;

use super::{ChatSession, MessageRecord, Result};

/// Storage for chat sessions and their messages.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Creates a session. Fails with `AlreadyExists` when the id is taken.
    async fn create_session(&self, session: &ChatSession) -> Result<()>;

    /// Gets a session. Expired sessions are treated as absent.
    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>>;

    /// Appends a message to an existing session.
    async fn append_message(&self, message: &MessageRecord) -> Result<()>;

    /// Lists a session's messages ordered by timestamp, then message id.
    async fn list_messages(&self, session_id: &str) -> Result<Vec<MessageRecord>>;
}
