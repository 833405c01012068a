//! Services composing the pure core with a data store.
//!
//! Services know nothing about caching; the [`Portal`](crate::state::Portal)
//! wraps their reads in the cache and turns their writes into evictions.

mod costing;
mod invoicing;
mod ledger;
mod receipts;
mod reporting;

pub use costing::JobCosting;
pub use invoicing::{InvoiceLedger, NewInvoice, PaymentEntry};
pub use ledger::{ItemLedger, LedgerReport};
pub use receipts::{receipt_events, ReceiptIntake, SavedReceipt};
pub use reporting::Reporting;
