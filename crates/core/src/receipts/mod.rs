//! Receipt intake: draft validation, line cleanup and job-cost derivation.

mod error;
mod operations;
mod types;

pub use error::ReceiptError;
pub use operations::{
    find_po_reference, job_costs_for_receipt, valid_lines, validate_draft, JOB_MATCH_LIMIT,
};
pub use types::{Receipt, ReceiptDraft, ReceiptLineItem, ReceiptStatus};
