//! Read-through caching of source fetches.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use benson_core::cache::{from_cache_value, to_cache_value, Cache, CacheKey};

use crate::instrument::Instrumentation;

/// The outcome of a cached read.
///
/// `data: None` means the source had nothing to show, which is distinct from
/// the source failing (an `Err` from [`CachedFetch::with_cache`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fetched<T> {
    pub data: Option<T>,
    pub from_cache: bool,
}

impl<T> Fetched<T> {
    fn cached(data: T) -> Self {
        Self {
            data: Some(data),
            from_cache: true,
        }
    }

    fn fresh(data: Option<T>) -> Self {
        Self {
            data,
            from_cache: false,
        }
    }
}

/// Cache-aside wrapper around source fetches.
///
/// Only successful, non-empty results are cached. Cache failures of any kind
/// fall through to the source.
#[derive(Clone)]
pub struct CachedFetch {
    cache: Arc<dyn Cache>,
    instrumentation: Instrumentation,
}

impl CachedFetch {
    pub fn new(cache: Arc<dyn Cache>, instrumentation: Instrumentation) -> Self {
        Self {
            cache,
            instrumentation,
        }
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its
    /// result for `ttl`.
    pub async fn with_cache<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        fetch: F,
    ) -> Result<Fetched<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        let cache_key = key.to_string();

        if let Ok(Some(value)) = self.cache.get(&cache_key).await {
            match from_cache_value(value) {
                Ok(data) => {
                    tracing::trace!(key = %cache_key, "Cache hit");
                    return Ok(Fetched::cached(data));
                }
                Err(e) => tracing::warn!(key = %cache_key, error = %e, "Cached value has wrong shape"),
            }
        }

        tracing::trace!(key = %cache_key, "Cache miss");
        let data = self.instrumentation.measure(&cache_key, fetch()).await?;

        if let Some(ref value) = data {
            match to_cache_value(value) {
                Ok(json) => {
                    if let Err(e) = self.cache.set(&cache_key, &json, ttl).await {
                        tracing::warn!(key = %cache_key, error = %e, "Failed to cache value");
                    }
                }
                Err(e) => tracing::warn!(key = %cache_key, error = %e, "Failed to serialize value"),
            }
        }

        Ok(Fetched::fresh(data))
    }
}
