use thiserror::Error;

/// Validation failures for a receipt draft.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReceiptError {
    #[error("Receipt vendor is required")]
    MissingVendor,
    #[error("Receipt total is required")]
    MissingTotal,
}
