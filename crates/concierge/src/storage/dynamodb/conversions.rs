//! DynamoDB attribute conversion functions.
//!
//! Pure functions between `AttributeValue` maps and session records, testable
//! without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use concierge_core::chat::{ChatRole, ReplySource};
use concierge_core::session::{ChatSession, MessageRecord, RepositoryError};

use super::keys;

pub const ENTITY_TYPE_SESSION: &str = "SESSION";
pub const ENTITY_TYPE_MESSAGE: &str = "MESSAGE";

type Item = HashMap<String, AttributeValue>;

pub fn session_to_item(session: &ChatSession) -> Item {
    let mut item = HashMap::new();

    item.insert(
        "PK".to_string(),
        AttributeValue::S(keys::session_pk(&session.session_id)),
    );
    item.insert(
        "SK".to_string(),
        AttributeValue::S(keys::session_sk().to_string()),
    );
    item.insert(
        "entityType".to_string(),
        AttributeValue::S(ENTITY_TYPE_SESSION.to_string()),
    );

    item.insert(
        "sessionId".to_string(),
        AttributeValue::S(session.session_id.clone()),
    );
    item.insert(
        "createdAt".to_string(),
        AttributeValue::S(session.created_at.to_rfc3339()),
    );
    item.insert("ttl".to_string(), AttributeValue::N(session.ttl.to_string()));

    item
}

pub fn item_to_session(item: &Item) -> Result<ChatSession, RepositoryError> {
    Ok(ChatSession {
        session_id: get_string(item, "sessionId")?,
        created_at: get_datetime(item, "createdAt")?,
        ttl: get_number(item, "ttl")?,
    })
}

pub fn message_to_item(message: &MessageRecord) -> Item {
    let mut item = HashMap::new();

    item.insert(
        "PK".to_string(),
        AttributeValue::S(keys::session_pk(&message.session_id)),
    );
    item.insert(
        "SK".to_string(),
        AttributeValue::S(keys::message_sk(message.timestamp, message.message_id)),
    );
    item.insert(
        "entityType".to_string(),
        AttributeValue::S(ENTITY_TYPE_MESSAGE.to_string()),
    );

    item.insert(
        "sessionId".to_string(),
        AttributeValue::S(message.session_id.clone()),
    );
    item.insert(
        "messageId".to_string(),
        AttributeValue::S(message.message_id.to_string()),
    );
    item.insert(
        "role".to_string(),
        AttributeValue::S(message.role.as_str().to_string()),
    );
    item.insert(
        "content".to_string(),
        AttributeValue::S(message.content.clone()),
    );
    item.insert(
        "timestamp".to_string(),
        AttributeValue::S(message.timestamp.to_rfc3339()),
    );
    item.insert("ttl".to_string(), AttributeValue::N(message.ttl.to_string()));
    if let Some(source) = message.source {
        item.insert(
            "source".to_string(),
            AttributeValue::S(source.as_str().to_string()),
        );
    }

    item
}

pub fn item_to_message(item: &Item) -> Result<MessageRecord, RepositoryError> {
    let role = get_string(item, "role")?;
    let role = ChatRole::parse(&role)
        .ok_or_else(|| RepositoryError::InvalidData(format!("unknown role: {role}")))?;

    let source = match get_optional_string(item, "source") {
        Some(raw) => Some(
            ReplySource::parse(&raw)
                .ok_or_else(|| RepositoryError::InvalidData(format!("unknown source: {raw}")))?,
        ),
        None => None,
    };

    Ok(MessageRecord {
        session_id: get_string(item, "sessionId")?,
        message_id: get_uuid(item, "messageId")?,
        role,
        content: get_string(item, "content")?,
        timestamp: get_datetime(item, "timestamp")?,
        ttl: get_number(item, "ttl")?,
        source,
    })
}

fn get_string(item: &Item, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

fn get_optional_string(item: &Item, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

fn get_number(item: &Item, key: &str) -> Result<i64, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid number: {}", key)))
}

fn get_uuid(item: &Item, key: &str) -> Result<Uuid, RepositoryError> {
    let s = get_string(item, key)?;
    Uuid::parse_str(&s)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid UUID {}: {}", key, e)))
}

fn get_datetime(item: &Item, key: &str) -> Result<DateTime<Utc>, RepositoryError> {
    let s = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid datetime {}: {}", key, e)))
}
