use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::Result;

/// Trait for TTL cache operations over JSON payloads.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a live value by key. Expired entries read as `None`.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Sets a value that expires after `ttl`, overwriting any previous value.
    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<()>;

    /// Deletes a value by key.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Deletes all values whose key matches a glob pattern (e.g. `"*report_*"`).
    async fn delete_pattern(&self, pattern: &str) -> Result<()>;
}

/// A synchronous string-keyed storage medium backing a cache.
///
/// This is the durable "local storage" a cache persists into. Implementations
/// hold keys from every namespace; callers are responsible for prefixing.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: String) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Lists every key currently held by the medium.
    fn keys(&self) -> Result<Vec<String>>;
}
