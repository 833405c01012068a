use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache storage failed: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Corrupted cache entry for key {0}")]
    Corrupted(String),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
