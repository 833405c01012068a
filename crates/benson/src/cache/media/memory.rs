//! In-memory key-value medium with LRU eviction.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use lru::LruCache;

use benson_core::cache::{CacheError, KeyValueStore, Result};

/// Process-local key-value medium.
///
/// Uses LRU eviction to limit memory usage once `max_entries` is reached.
/// Entries are lost when the process exits.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<LruCache<String, String>>,
}

impl MemoryStore {
    /// Creates an empty medium holding at most `max_entries` values.
    ///
    /// A capacity of 0 is treated as 1.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LruCache<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        self.lock()?.put(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.pop(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.iter().map(|(key, _)| key.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let store = MemoryStore::new(10);
        store.set("k", "v".to_string()).unwrap();

        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new(10);
        store.set("k", "v".to_string()).unwrap();
        store.remove("k").unwrap();
        store.remove("never-set").unwrap();

        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_lru_eviction() {
        let store = MemoryStore::new(2);
        store.set("a", "1".to_string()).unwrap();
        store.set("b", "2".to_string()).unwrap();
        // Touch "a" so "b" becomes least recently used.
        store.get("a").unwrap();
        store.set("c", "3".to_string()).unwrap();

        assert!(store.get("a").unwrap().is_some());
        assert!(store.get("b").unwrap().is_none());
        assert!(store.get("c").unwrap().is_some());
    }

    #[test]
    fn test_zero_capacity_holds_one_entry() {
        let store = MemoryStore::new(0);
        store.set("a", "1".to_string()).unwrap();
        store.set("b", "2".to_string()).unwrap();

        assert_eq!(store.keys().unwrap(), vec!["b".to_string()]);
    }
}
