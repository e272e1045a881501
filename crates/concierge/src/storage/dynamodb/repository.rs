//! DynamoDB session repository.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::Utc;

use concierge_core::session::{
    live_messages, ChatSession, MessageRecord, RepositoryError, Result, SessionRepository,
};

use super::conversions::{item_to_message, item_to_session, message_to_item, session_to_item};
use super::error::{map_get_item_error, map_put_item_error, map_query_error};
use super::keys;

pub struct DynamoDbSessionRepository {
    client: Client,
    table_name: String,
}

impl DynamoDbSessionRepository {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl SessionRepository for DynamoDbSessionRepository {
    /// An expired session that DynamoDB has not swept yet may be replaced.
    async fn create_session(&self, session: &ChatSession) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(session_to_item(session)))
            .condition_expression("attribute_not_exists(PK) OR #ttl < :now")
            .expression_attribute_names("#ttl", "ttl")
            .expression_attribute_values(
                ":now",
                AttributeValue::N(Utc::now().timestamp().to_string()),
            )
            .send()
            .await
            .map_err(|e| map_put_item_error(e, "ChatSession", session.session_id.clone()))?;

        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(keys::session_pk(session_id)))
            .key("SK", AttributeValue::S(keys::session_sk().to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_get_item_error)?;

        let now = Utc::now();
        match result.item {
            Some(item) => Ok(Some(item_to_session(&item)?).filter(|s| !s.is_expired(now))),
            None => Ok(None),
        }
    }

    async fn append_message(&self, message: &MessageRecord) -> Result<()> {
        if self.get_session(&message.session_id).await?.is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "ChatSession",
                id: message.session_id.clone(),
            });
        }

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(message_to_item(message)))
            .condition_expression("attribute_not_exists(PK)")
            .send()
            .await
            .map_err(|e| {
                map_put_item_error(
                    e,
                    "MessageRecord",
                    format!("{}/{}", message.session_id, message.message_id),
                )
            })?;

        Ok(())
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<MessageRecord>> {
        let mut messages = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let result = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("PK = :pk AND begins_with(SK, :prefix)")
                .expression_attribute_values(
                    ":pk",
                    AttributeValue::S(keys::session_pk(session_id)),
                )
                .expression_attribute_values(
                    ":prefix",
                    AttributeValue::S(keys::message_sk_prefix().to_string()),
                )
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(map_query_error)?;

            for item in result.items.unwrap_or_default() {
                messages.push(item_to_message(&item)?);
            }

            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        // DynamoDB sweeps expired items lazily.
        Ok(live_messages(messages, Utc::now()))
    }
}
