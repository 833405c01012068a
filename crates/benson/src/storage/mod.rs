//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `benson_core::storage`.
//!
//! # Feature Flags
//!
//! - (always): in-memory backend, used by tests and the demo binary
//! - `sqlite`: SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! # Examples
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p benson --features sqlite
//! ```

#[cfg_attr(feature = "sqlite", allow(dead_code))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg_attr(feature = "sqlite", allow(unused_imports))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
