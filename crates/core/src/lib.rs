//! Functional core for the benson operations portal.
//!
//! Everything in this crate is pure: domain types, cache key taxonomy,
//! costing and reporting arithmetic, and the traits the shell implements
//! for storage and caching. No I/O happens here.

pub mod cache;
pub mod costing;
pub mod invoicing;
pub mod ledger;
pub mod receipts;
pub mod reporting;
pub mod serde;
pub mod storage;
