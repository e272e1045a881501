use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use concierge_core::session::{
    live_messages, ChatSession, MessageRecord, RepositoryError, Result, SessionRepository,
};

/// In-memory session storage.
///
/// Messages are keyed by `(session_id, message_id)`.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, ChatSession>>>,
    messages: Arc<RwLock<HashMap<(String, Uuid), MessageRecord>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create_session(&self, session: &ChatSession) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        if sessions
            .get(&session.session_id)
            .is_some_and(|existing| !existing.is_expired(now))
        {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "ChatSession",
                id: session.session_id.clone(),
            });
        }
        if sessions
            .insert(session.session_id.clone(), session.clone())
            .is_some()
        {
            // Replacing an expired session: its messages go with it.
            let mut messages = self.messages.write().await;
            messages.retain(|(id, _), m| id != &session.session_id && !m.is_expired(now));
        }
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>> {
        let sessions = self.sessions.read().await;
        let now = Utc::now();
        Ok(sessions
            .get(session_id)
            .filter(|s| !s.is_expired(now))
            .cloned())
    }

    async fn append_message(&self, message: &MessageRecord) -> Result<()> {
        if self.get_session(&message.session_id).await?.is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "ChatSession",
                id: message.session_id.clone(),
            });
        }

        let mut messages = self.messages.write().await;
        let key = (message.session_id.clone(), message.message_id);
        if messages.contains_key(&key) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "MessageRecord",
                id: format!("{}/{}", message.session_id, message.message_id),
            });
        }
        messages.insert(key, message.clone());
        Ok(())
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<MessageRecord>> {
        let messages = self.messages.read().await;
        let found: Vec<MessageRecord> = messages
            .values()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();
        Ok(live_messages(found, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use concierge_core::chat::{ChatRole, ReplySource};

    fn session(id: &str) -> ChatSession {
        ChatSession::new(id, Utc::now(), 7)
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let repo = InMemorySessionRepository::new();
        let created = session("session-1");

        repo.create_session(&created).await.unwrap();

        assert_eq!(repo.get_session("session-1").await.unwrap(), Some(created));
        assert_eq!(repo.get_session("session-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_duplicate_session() {
        let repo = InMemorySessionRepository::new();
        repo.create_session(&session("session-1")).await.unwrap();

        let result = repo.create_session(&session("session-1")).await;

        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "ChatSession",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_absent_and_replaceable() {
        let repo = InMemorySessionRepository::new();
        let old = ChatSession::new("session-1", Utc.timestamp_opt(0, 0).unwrap(), 7);
        repo.create_session(&old).await.unwrap();

        assert_eq!(repo.get_session("session-1").await.unwrap(), None);
        repo.create_session(&session("session-1")).await.unwrap();
        assert!(repo.get_session("session-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_recreated_session_starts_without_old_messages() {
        let repo = InMemorySessionRepository::new();
        let old = ChatSession::new("session-1", Utc.timestamp_opt(0, 0).unwrap(), 7);
        repo.create_session(&old).await.unwrap();
        // Stored while the old session was still live.
        let leftover = MessageRecord::new("session-1", ChatRole::User, "old secret", Utc::now(), 7);
        repo.messages
            .write()
            .await
            .insert(("session-1".to_string(), leftover.message_id), leftover);

        repo.create_session(&session("session-1")).await.unwrap();

        assert!(repo.list_messages("session-1").await.unwrap().is_empty());
        assert!(repo.messages.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_expired_messages_are_not_listed() {
        let repo = InMemorySessionRepository::new();
        repo.create_session(&session("session-1")).await.unwrap();
        let stale = MessageRecord::new(
            "session-1",
            ChatRole::User,
            "stale",
            Utc.timestamp_opt(0, 0).unwrap(),
            7,
        );
        let fresh = MessageRecord::new("session-1", ChatRole::User, "fresh", Utc::now(), 7);
        repo.append_message(&stale).await.unwrap();
        repo.append_message(&fresh).await.unwrap();

        let messages = repo.list_messages("session-1").await.unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "fresh");
    }

    #[tokio::test]
    async fn test_append_requires_session() {
        let repo = InMemorySessionRepository::new();
        let message = MessageRecord::new("missing", ChatRole::User, "hi", Utc::now(), 7);

        let result = repo.append_message(&message).await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_append_duplicate_message() {
        let repo = InMemorySessionRepository::new();
        repo.create_session(&session("session-1")).await.unwrap();
        let message = MessageRecord::new("session-1", ChatRole::User, "hi", Utc::now(), 7);

        repo.append_message(&message).await.unwrap();
        let result = repo.append_message(&message).await;

        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "MessageRecord",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_list_messages_in_order() {
        let repo = InMemorySessionRepository::new();
        repo.create_session(&session("session-1")).await.unwrap();
        repo.create_session(&session("session-2")).await.unwrap();
        let now = Utc::now();

        let answer = MessageRecord::new("session-1", ChatRole::Assistant, "answer", now, 7)
            .with_source(ReplySource::Fallback);
        let question = MessageRecord::new(
            "session-1",
            ChatRole::User,
            "question",
            now - Duration::seconds(1),
            7,
        );
        let other = MessageRecord::new("session-2", ChatRole::User, "other", now, 7);
        repo.append_message(&answer).await.unwrap();
        repo.append_message(&question).await.unwrap();
        repo.append_message(&other).await.unwrap();

        let messages = repo.list_messages("session-1").await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();

        assert_eq!(contents, vec!["question", "answer"]);
        assert_eq!(messages[1].source, Some(ReplySource::Fallback));
    }
}
