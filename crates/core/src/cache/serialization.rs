//! JSON encoding of cached values.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CacheError, Result};

pub fn serialize_value<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| CacheError::Encode(e.to_string()))
}

pub fn deserialize_value<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| CacheError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_deserialize_garbage_fails() {
        let result: Result<Value> = deserialize_value(b"not json");
        assert!(matches!(result, Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_value_survives_encoding() {
        let value = json!({"total_cost": 10.5, "currency": "USD"});
        let bytes = serialize_value(&value).unwrap();
        let decoded: Value = deserialize_value(&bytes).unwrap();
        assert_eq!(decoded, value);
    }
}
