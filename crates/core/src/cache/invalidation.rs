//! Routing of domain mutations to cache evictions.
//!
//! Only the families listed here are evicted. A cached key outside these
//! families stays readable until its TTL lapses, even if the underlying
//! rows changed.

use uuid::Uuid;

use super::KeyFamily;

/// A write that may have made cached responses stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationEvent {
    /// A job or one of its cost, labor, revenue or estimate facts changed.
    JobChanged { job_id: Option<Uuid> },
    /// An invoice or its payments changed.
    InvoiceChanged { invoice_id: Option<Uuid> },
    /// A receipt was saved and its lines fed to the item ledger.
    ReceiptIngested,
    /// Anything that feeds the company-level reports changed.
    ReportsChanged,
}

/// Returns the key families to evict for a mutation.
pub fn evictions(event: &MutationEvent) -> Vec<KeyFamily> {
    match event {
        MutationEvent::JobChanged { job_id } => {
            let mut families = vec![KeyFamily::JobsLists];
            families.extend(job_id.map(KeyFamily::JobScoped));
            families
        }
        MutationEvent::InvoiceChanged { invoice_id } => {
            let mut families = vec![KeyFamily::InvoicesLists];
            families.extend(invoice_id.map(KeyFamily::InvoiceScoped));
            families
        }
        MutationEvent::ReceiptIngested => vec![KeyFamily::ItemLibrary, KeyFamily::VendorAnalysis],
        MutationEvent::ReportsChanged => vec![KeyFamily::Reports],
    }
}
