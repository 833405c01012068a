//! Expiring JSON cache over a key-value medium.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use benson_core::cache::{
    decode_envelope, encode_envelope, pattern_matches, Cache, CacheEnvelope, CacheError,
    KeyValueStore, Result,
};

/// TTL cache persisting [`CacheEnvelope`]s into a [`KeyValueStore`].
///
/// Every logical key is stored under `prefix + key`, so several namespaces
/// can share one medium. Expired entries are removed lazily on read.
///
/// Failures never escape: a broken medium or a corrupted entry is logged
/// and reads as a miss, and a failed write is a no-op.
pub struct TtlCache<S> {
    store: Arc<S>,
    prefix: String,
}

impl<S: KeyValueStore> TtlCache<S> {
    /// Creates a cache storing its entries in `store` under `prefix`.
    pub fn new(store: Arc<S>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn read(&self, key: &str, now_ms: i64) -> Result<Option<Value>> {
        let storage_key = self.namespaced(key);
        let Some(raw) = self.store.get(&storage_key)? else {
            return Ok(None);
        };

        let envelope = match decode_envelope(key, &raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                self.store.remove(&storage_key)?;
                return Err(e);
            }
        };

        if envelope.is_expired(now_ms) {
            self.store.remove(&storage_key)?;
            return Ok(None);
        }

        Ok(Some(envelope.value))
    }

    fn write(&self, key: &str, value: &Value, ttl: Duration, now_ms: i64) -> Result<()> {
        let envelope = CacheEnvelope::new(value.clone(), now_ms, ttl);
        let raw = encode_envelope(&envelope)?;
        self.store.set(&self.namespaced(key), raw)
    }

    fn remove_matching(&self, pattern: &str) -> Result<usize> {
        let matching: Vec<String> = self
            .store
            .keys()?
            .into_iter()
            .filter(|stored| {
                stored
                    .strip_prefix(&self.prefix)
                    .is_some_and(|key| pattern_matches(pattern, key))
            })
            .collect();

        for stored in &matching {
            self.store.remove(stored)?;
        }
        Ok(matching.len())
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[async_trait]
impl<S: KeyValueStore + 'static> Cache for TtlCache<S> {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        match self.read(key, now_ms()) {
            Ok(Some(value)) => {
                tracing::trace!(key = %key, "Cache entry read");
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(CacheError::Corrupted(_)) => {
                tracing::warn!(key = %key, "Dropped corrupted cache entry");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<()> {
        if let Err(e) = self.write(key, value, ttl, now_ms()) {
            tracing::warn!(key = %key, error = %e, "Cache write failed");
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if let Err(e) = self.store.remove(&self.namespaced(key)) {
            tracing::warn!(key = %key, error = %e, "Cache delete failed");
        }
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        match self.remove_matching(pattern) {
            Ok(removed) => tracing::debug!(pattern = %pattern, removed, "Cleared cache entries"),
            Err(e) => tracing::warn!(pattern = %pattern, error = %e, "Cache clear failed"),
        }
        Ok(())
    }
}
