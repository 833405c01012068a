//! Evicts cached responses after writes.

use std::collections::HashSet;
use std::sync::Arc;

use benson_core::cache::{evictions, Cache, KeyFamily, MutationEvent};

/// Routes mutation events to cache evictions.
#[derive(Clone)]
pub struct Invalidator {
    cache: Arc<dyn Cache>,
}

impl Invalidator {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Evicts every key family touched by `events`, each family once.
    ///
    /// Failures are logged and skipped; a stale entry lives until its TTL.
    pub async fn apply(&self, events: &[MutationEvent]) {
        let mut seen = HashSet::new();
        let families: Vec<KeyFamily> = events
            .iter()
            .flat_map(evictions)
            .filter(|family| seen.insert(*family))
            .collect();

        for family in families {
            self.clear(&family.pattern()).await;
        }
    }

    /// Deletes every cached entry whose key matches the glob `pattern`.
    pub async fn clear(&self, pattern: &str) {
        tracing::debug!(pattern = %pattern, "Invalidating cache");
        if let Err(e) = self.cache.delete_pattern(pattern).await {
            tracing::warn!(pattern = %pattern, error = %e, "Cache invalidation failed");
        }
    }
}
