//! Pure functions for converting domain values to and from cached JSON.
//!
//! Cached payloads are kept as `serde_json::Value` so that the persisted
//! entry stays human-readable and easy to inspect in the key-value medium.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{CacheError, Result};

/// Converts a value into its cached JSON form.
pub fn to_cache_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// Converts a cached JSON value back into a domain value.
pub fn from_cache_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| CacheError::Serialization(e.to_string()))
}
