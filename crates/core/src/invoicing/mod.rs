//! Invoices, payments and the arithmetic around them.

mod error;
mod operations;
mod types;

pub use error::InvoiceError;
pub use operations::{
    due_date, invoice_sequence, next_invoice_number, payment_status, validate_payment_amount,
    DEFAULT_INVOICE_PREFIX, INVOICE_LIST_LIMIT,
};
pub use types::{Invoice, InvoicePayment, InvoiceStatus, PaymentStatus, PaymentTerms};
