//! The persisted layout of a cache entry.
//!
//! A cache entry is stored as the JSON string `{"value": ..., "expiry": ms}`
//! where `expiry` is a Unix epoch timestamp in milliseconds. An entry is
//! readable only while `now < expiry`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CacheError, Result};

/// A cached value with its absolute expiry instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEnvelope {
    pub value: Value,
    /// Expiry as milliseconds since the Unix epoch.
    pub expiry: i64,
}

impl CacheEnvelope {
    /// Wraps `value` so that it expires `ttl` after `now_ms`.
    pub fn new(value: Value, now_ms: i64, ttl: Duration) -> Self {
        Self {
            value,
            expiry: expiry_after(now_ms, ttl),
        }
    }

    /// Returns true once `now_ms` has reached the expiry instant.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expiry
    }
}

/// Computes the absolute expiry for a TTL, saturating instead of overflowing.
pub fn expiry_after(now_ms: i64, ttl: Duration) -> i64 {
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    now_ms.saturating_add(ttl_ms)
}

/// Serializes an envelope to the string stored in the key-value medium.
pub fn encode_envelope(envelope: &CacheEnvelope) -> Result<String> {
    serde_json::to_string(envelope).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// Parses a stored string back into an envelope.
pub fn decode_envelope(key: &str, raw: &str) -> Result<CacheEnvelope> {
    serde_json::from_str(raw).map_err(|_| CacheError::Corrupted(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_714_521_600_000; // 2024-05-01T00:00:00Z

    #[test]
    fn test_expiry_is_now_plus_ttl() {
        let envelope = CacheEnvelope::new(json!([1, 2]), NOW, Duration::from_secs(5 * 60));
        assert_eq!(envelope.expiry, NOW + 300_000);
    }

    #[test]
    fn test_readable_strictly_before_expiry() {
        let envelope = CacheEnvelope::new(json!("v"), NOW, Duration::from_millis(10));
        assert!(!envelope.is_expired(NOW));
        assert!(!envelope.is_expired(NOW + 9));
        assert!(envelope.is_expired(NOW + 10));
        assert!(envelope.is_expired(NOW + 11));
    }

    #[test]
    fn test_persisted_layout() {
        let envelope = CacheEnvelope {
            value: json!({"total": 6.5}),
            expiry: 1000,
        };
        let raw = encode_envelope(&envelope).unwrap();
        assert_eq!(raw, r#"{"value":{"total":6.5},"expiry":1000}"#);
        assert_eq!(decode_envelope("k", &raw).unwrap(), envelope);
    }

    #[test]
    fn test_decode_corrupted_entry() {
        let err = decode_envelope("jobs_list", "not json").unwrap_err();
        assert_eq!(err, CacheError::Corrupted("jobs_list".to_string()));

        let err = decode_envelope("jobs_list", r#"{"value":1}"#).unwrap_err();
        assert!(matches!(err, CacheError::Corrupted(_)));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        assert_eq!(expiry_after(NOW, Duration::MAX), i64::MAX);
    }
}
