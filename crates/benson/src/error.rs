use thiserror::Error;

use benson_core::invoicing::InvoiceError;
use benson_core::receipts::ReceiptError;
use benson_core::storage::{DateRangeError, RepositoryError};

/// Failure of a whole service operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
    #[error(transparent)]
    Invoice(#[from] InvoiceError),
    #[error(transparent)]
    DateRange(#[from] DateRangeError),
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_is_transparent() {
        let error: ServiceError = RepositoryError::QueryFailed("locked".to_string()).into();
        assert_eq!(error.to_string(), "Query failed: locked");
    }

    #[test]
    fn test_not_found_display() {
        let error = ServiceError::NotFound {
            entity_type: "Invoice",
            id: "abc".to_string(),
        };
        assert_eq!(error.to_string(), "Invoice not found: abc");
    }
}
