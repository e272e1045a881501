//! DynamoDB key generation functions.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

pub const SESSION_PREFIX: &str = "SESSION#";
pub const MESSAGE_PREFIX: &str = "MSG#";
pub const SESSION_META_SK: &str = "META";

/// Pattern: `SESSION#<session_id>`
pub fn session_pk(session_id: &str) -> String {
    format!("{SESSION_PREFIX}{session_id}")
}

/// Pattern: `META`
pub fn session_sk() -> &'static str {
    SESSION_META_SK
}

/// Pattern: `MSG#<timestamp>#<message_id>`
///
/// The timestamp always has microsecond precision and a `Z` suffix so that
/// sort keys order the same way the timestamps do.
pub fn message_sk(timestamp: DateTime<Utc>, message_id: Uuid) -> String {
    format!(
        "{MESSAGE_PREFIX}{}#{message_id}",
        timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    )
}

/// Sort key prefix shared by every message of a session.
pub fn message_sk_prefix() -> &'static str {
    MESSAGE_PREFIX
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_session_keys() {
        assert_eq!(session_pk("session-abc"), "SESSION#session-abc");
        assert_eq!(session_sk(), "META");
    }

    #[test]
    fn test_message_sk() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap();
        assert_eq!(
            message_sk(ts, id),
            "MSG#2024-06-15T10:30:00.000000Z#550e8400-e29b-41d4-a716-446655440001"
        );
        assert!(message_sk(ts, id).starts_with(message_sk_prefix()));
    }

    #[test]
    fn test_message_sk_orders_by_time() {
        let id = Uuid::nil();
        let earlier = Utc.with_ymd_and_hms(2024, 6, 15, 9, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
        assert!(message_sk(earlier, id) < message_sk(later, id));
    }
}
