//! Bedrock Agent action-group events.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::serde::{json_type_name, scalar_to_string};
use crate::tool::{Operation, Result, ToolError, ToolParams};

const JSON_CONTENT_TYPE: &str = "application/json";

/// A `{name, type, value}` parameter as sent by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParameter {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Value,
}

/// Agents send a parameter list; hand-written test events often use a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventParameters {
    List(Vec<EventParameter>),
    Map(Map<String, Value>),
}

impl Default for EventParameters {
    fn default() -> Self {
        EventParameters::List(Vec::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyContent {
    #[serde(default)]
    pub properties: Vec<EventParameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: BTreeMap<String, BodyContent>,
}

/// An action-group invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGroupEvent {
    #[serde(default)]
    pub message_version: Option<String>,
    #[serde(default)]
    pub action_group: String,
    #[serde(default)]
    pub api_path: String,
    #[serde(default = "default_http_method")]
    pub http_method: String,
    #[serde(default)]
    pub parameters: EventParameters,
    #[serde(default)]
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub input_text: Option<String>,
}

fn default_http_method() -> String {
    "POST".to_string()
}

impl ActionGroupEvent {
    pub fn operation(&self) -> Result<Operation> {
        Operation::from_api_path(&self.api_path)
    }

    /// Merges path/query parameters with JSON body properties. Body properties win.
    pub fn params(&self) -> Result<ToolParams> {
        let mut params = ToolParams::new();

        match &self.parameters {
            EventParameters::List(list) => {
                for parameter in list {
                    insert_value(&mut params, &parameter.name, &parameter.value)?;
                }
            }
            EventParameters::Map(map) => {
                for (name, value) in map {
                    insert_value(&mut params, name, value)?;
                }
            }
        }

        if let Some(content) = self
            .request_body
            .as_ref()
            .and_then(|body| body.content.get(JSON_CONTENT_TYPE))
        {
            for property in &content.properties {
                insert_value(&mut params, &property.name, &property.value)?;
            }
        }

        Ok(params)
    }
}

fn insert_value(params: &mut ToolParams, name: &str, value: &Value) -> Result<()> {
    match scalar_to_string(value) {
        Ok(Some(value)) => {
            params.insert(name, value);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(_) => Err(ToolError::InvalidInput(format!(
            "parameter {name} must be a scalar, got {}",
            json_type_name(value)
        ))),
    }
}
