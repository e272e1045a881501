use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::{ChatRole, ReplySource};

/// Default retention of session records.
pub const DEFAULT_TTL_DAYS: i64 = 7;

/// Longest accepted retention, about ten years.
pub const MAX_TTL_DAYS: i64 = 3_650;

/// Epoch seconds `ttl_days` after `from`. Saturates instead of overflowing.
pub fn expiry_epoch(from: DateTime<Utc>, ttl_days: i64) -> i64 {
    Duration::try_days(ttl_days)
        .and_then(|ttl| from.checked_add_signed(ttl))
        .map(|expiry| expiry.timestamp())
        .unwrap_or(if ttl_days < 0 { i64::MIN } else { i64::MAX })
}

/// A recorded chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    /// Expiry in epoch seconds.
    pub ttl: i64,
}

impl ChatSession {
    pub fn new(session_id: impl Into<String>, created_at: DateTime<Utc>, ttl_days: i64) -> Self {
        Self {
            session_id: session_id.into(),
            created_at,
            ttl: expiry_epoch(created_at, ttl_days),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.ttl < now.timestamp()
    }
}

/// One message of a recorded session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub session_id: String,
    pub message_id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub ttl: i64,
    /// Set on assistant messages.
    pub source: Option<ReplySource>,
}

impl MessageRecord {
    pub fn new(
        session_id: impl Into<String>,
        role: ChatRole,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
        ttl_days: i64,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            message_id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp,
            ttl: expiry_epoch(timestamp, ttl_days),
            source: None,
        }
    }

    pub fn with_source(mut self, source: ReplySource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_id(mut self, message_id: Uuid) -> Self {
        self.message_id = message_id;
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.ttl < now.timestamp()
    }
}

/// Drops expired messages and sorts the rest.
///
/// A session id can be reused once its session expired, so messages left
/// over from the earlier conversation must not show up in the new one.
pub fn live_messages(mut messages: Vec<MessageRecord>, now: DateTime<Utc>) -> Vec<MessageRecord> {
    messages.retain(|m| !m.is_expired(now));
    sort_messages(&mut messages);
    messages
}

/// Sorts messages by timestamp, then message id.
pub fn sort_messages(messages: &mut [MessageRecord]) {
    messages.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.message_id.cmp(&b.message_id))
    });
}

/// A session with its messages, as returned by the sessions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTranscript {
    #[serde(flatten)]
    pub session: ChatSession,
    pub messages: Vec<MessageRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_session_ttl() {
        let session = ChatSession::new("s-1", at(1_000_000), 7);
        assert_eq!(session.ttl, 1_000_000 + 7 * 86_400);
        assert!(!session.is_expired(at(1_000_000 + 7 * 86_400)));
        assert!(session.is_expired(at(1_000_000 + 7 * 86_400 + 1)));
    }

    #[test]
    fn test_expiry_saturates_on_huge_ttl() {
        assert_eq!(expiry_epoch(at(0), i64::MAX), i64::MAX);
        assert_eq!(expiry_epoch(at(0), 400_000_000), i64::MAX);
        assert_eq!(expiry_epoch(at(0), i64::MIN), i64::MIN);
    }

    #[test]
    fn test_live_messages_drops_expired() {
        let now = at(10 * 86_400);
        let messages = vec![
            MessageRecord::new("s", ChatRole::Assistant, "fresh", at(9 * 86_400), 7),
            MessageRecord::new("s", ChatRole::User, "stale", at(0), 1),
            MessageRecord::new("s", ChatRole::User, "first", at(8 * 86_400), 7),
        ];

        let live = live_messages(messages, now);
        let contents: Vec<&str> = live.iter().map(|m| m.content.as_str()).collect();

        assert_eq!(contents, vec!["first", "fresh"]);
    }

    #[test]
    fn test_message_record_builder() {
        let record = MessageRecord::new("s-1", ChatRole::Assistant, "hi", at(10), 1)
            .with_source(ReplySource::Fallback);
        assert_eq!(record.ttl, 10 + 86_400);
        assert_eq!(record.source, Some(ReplySource::Fallback));
    }

    #[test]
    fn test_sort_messages_by_time_then_id() {
        let first = Uuid::from_u128(1);
        let second = Uuid::from_u128(2);
        let mut messages = vec![
            MessageRecord::new("s", ChatRole::User, "late", at(20), 1),
            MessageRecord::new("s", ChatRole::Assistant, "b", at(10), 1).with_id(second),
            MessageRecord::new("s", ChatRole::User, "a", at(10), 1).with_id(first),
        ];
        sort_messages(&mut messages);
        let contents: Vec<_> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "late"]);
    }

    #[test]
    fn test_transcript_flattens_session() {
        let transcript = SessionTranscript {
            session: ChatSession::new("s-1", at(0), 1),
            messages: Vec::new(),
        };
        let json = serde_json::to_value(&transcript).unwrap();
        assert_eq!(json["session_id"], "s-1");
        assert!(json["messages"].as_array().unwrap().is_empty());
    }
}
