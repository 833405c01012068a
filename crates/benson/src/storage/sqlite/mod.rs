//! SQLite storage backend.
//!
//! Uses `rusqlite` for the queries and `tokio-rusqlite` to run them off the
//! async runtime. Enabled with the `sqlite` feature.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
