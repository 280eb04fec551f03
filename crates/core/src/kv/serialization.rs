//! Pure functions for encoding tables as the JSON arrays kept under each key.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Result, StoreError};

/// Serializes a table's records as a JSON array.
pub fn encode_table<T: Serialize>(records: &[T]) -> Result<String> {
    serde_json::to_string(records).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Deserializes a table's JSON array. An absent key is an empty table.
pub fn decode_table<T: DeserializeOwned>(raw: Option<&str>) -> Result<Vec<T>> {
    match raw {
        None => Ok(Vec::new()),
        Some(raw) => {
            serde_json::from_str(raw).map_err(|e| StoreError::Serialization(e.to_string()))
        }
    }
}
