//! Typed cache key taxonomy.
//!
//! Every cached response is addressed by a [`CacheKey`]. Each key belongs to
//! exactly one [`KeyFamily`], and families are what invalidation evicts. The
//! string forms are stable because they end up persisted in the key-value
//! medium under the namespace prefix.

use std::fmt;

use uuid::Uuid;

use crate::storage::DateRange;

/// A logical cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// All jobs, as listed by the job board.
    JobsList,
    /// Active jobs joined with their costing summaries (dashboard).
    ActiveJobsCosting,
    /// A single job record.
    Job(Uuid),
    /// Budget-vs-actual summary for one job.
    JobCostingSummary(Uuid),
    /// Category breakdown for one job.
    JobCostBreakdown(Uuid),
    /// The full invoice list.
    InvoicesList,
    /// Invoice list filtered by an invoice-number search term.
    InvoiceSearch(String),
    /// A single invoice.
    Invoice(Uuid),
    /// The whole item catalog.
    ItemLibrary,
    /// Catalog search results for a keyword.
    ItemSearch(String),
    /// Price history for one catalog item.
    ItemHistory(Uuid),
    /// Spend grouped by vendor over a date range.
    VendorAnalysis(DateRange),
    /// Company financial report over a date range.
    FinancialReport(DateRange),
    /// Active job performance report.
    JobPerformanceReport,
}

/// A group of cache keys evicted together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFamily {
    JobsLists,
    JobScoped(Uuid),
    InvoicesLists,
    InvoiceScoped(Uuid),
    ItemLibrary,
    VendorAnalysis,
    Reports,
}

impl CacheKey {
    /// Returns the family this key is evicted with.
    pub fn family(&self) -> KeyFamily {
        match self {
            CacheKey::JobsList | CacheKey::ActiveJobsCosting => KeyFamily::JobsLists,
            CacheKey::Job(id) | CacheKey::JobCostingSummary(id) | CacheKey::JobCostBreakdown(id) => {
                KeyFamily::JobScoped(*id)
            }
            CacheKey::InvoicesList | CacheKey::InvoiceSearch(_) => KeyFamily::InvoicesLists,
            CacheKey::Invoice(id) => KeyFamily::InvoiceScoped(*id),
            CacheKey::ItemLibrary | CacheKey::ItemSearch(_) | CacheKey::ItemHistory(_) => {
                KeyFamily::ItemLibrary
            }
            CacheKey::VendorAnalysis(_) => KeyFamily::VendorAnalysis,
            CacheKey::FinancialReport(_) | CacheKey::JobPerformanceReport => KeyFamily::Reports,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::JobsList => write!(f, "jobs_list"),
            CacheKey::ActiveJobsCosting => write!(f, "jobs_list:costing"),
            CacheKey::Job(id) => write!(f, "job_{id}:detail"),
            CacheKey::JobCostingSummary(id) => write!(f, "job_{id}:summary"),
            CacheKey::JobCostBreakdown(id) => write!(f, "job_{id}:breakdown"),
            CacheKey::InvoicesList => write!(f, "invoices_list"),
            CacheKey::InvoiceSearch(term) => write!(f, "invoices_list:search:{term}"),
            CacheKey::Invoice(id) => write!(f, "invoice_{id}:detail"),
            CacheKey::ItemLibrary => write!(f, "item_library"),
            CacheKey::ItemSearch(keyword) => write!(f, "item_library:search:{keyword}"),
            CacheKey::ItemHistory(id) => write!(f, "item_library:history:{id}"),
            CacheKey::VendorAnalysis(range) => {
                write!(f, "vendor_analysis:{}:{}", range.start, range.end)
            }
            CacheKey::FinancialReport(range) => {
                write!(f, "report_financial:{}:{}", range.start, range.end)
            }
            CacheKey::JobPerformanceReport => write!(f, "report_job_performance"),
        }
    }
}

impl KeyFamily {
    /// Returns the glob pattern matching every key of this family.
    pub fn pattern(&self) -> String {
        match self {
            KeyFamily::JobsLists => "jobs_list*".to_string(),
            KeyFamily::JobScoped(id) => format!("job_{id}:*"),
            KeyFamily::InvoicesLists => "invoices_list*".to_string(),
            KeyFamily::InvoiceScoped(id) => format!("invoice_{id}:*"),
            KeyFamily::ItemLibrary => "item_library*".to_string(),
            KeyFamily::VendorAnalysis => "vendor_analysis*".to_string(),
            KeyFamily::Reports => "*report_*".to_string(),
        }
    }
}
