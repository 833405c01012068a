use thiserror::Error;

use crate::storage::RepositoryError;

/// Errors that can occur while applying one purchase line to the catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Failed to process item {item_name}: {source}")]
    Line {
        item_name: String,
        #[source]
        source: RepositoryError,
    },
}

impl LedgerError {
    /// Wraps a repository failure for the named line.
    pub fn line(item_name: impl Into<String>, source: RepositoryError) -> Self {
        Self::Line {
            item_name: item_name.into(),
            source,
        }
    }
}
