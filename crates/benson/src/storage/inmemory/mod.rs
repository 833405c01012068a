//! In-memory storage backend.
//!
//! Stores all data in collections wrapped in `Arc<RwLock<_>>`. Useful for
//! testing and for running the binary against seeded demo data.
//!
//! # Example
//!
//! ```rust,ignore
//! use benson::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
