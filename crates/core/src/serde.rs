//! Serde helpers for loosely typed request payloads.
//!
//! Browser clients and Bedrock agents send blank strings for absent values
//! and numbers or booleans where a string is expected.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional string, treating blank strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Renders a JSON scalar as a string. `null` is None; arrays and objects are rejected.
pub fn scalar_to_string(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) => Err("expected a scalar value, got an array".to_string()),
        Value::Object(_) => Err("expected a scalar value, got an object".to_string()),
    }
}

/// Deserialize a string, number or boolean into a string.
pub fn deserialize_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(&value).map_err(serde::de::Error::custom)
}

/// The JSON type name of a value, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
