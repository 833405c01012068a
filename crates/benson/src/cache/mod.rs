//! Cache backend implementations.
//!
//! This module provides the concrete cache used by the portal: a
//! [`TtlCache`] implementing `benson_core::cache::Cache` on top of any
//! synchronous [`KeyValueStore`](benson_core::cache::KeyValueStore) medium.
//!
//! # Media
//!
//! - [`MemoryStore`]: LRU-bounded, process-local
//! - [`FileStore`]: a JSON object persisted to disk, surviving restarts

mod media;
mod ttl;

pub use media::{FileStore, MemoryStore};
pub use ttl::TtlCache;
