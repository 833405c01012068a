use async_trait::async_trait;
use uuid::Uuid;

use crate::costing::{Estimate, Job, JobCostRecord, JobLaborRecord, JobRevenueRecord};
use crate::invoicing::{Invoice, InvoicePayment};
use crate::ledger::{CatalogItem, PriceHistoryEntry};
use crate::receipts::{Receipt, ReceiptLineItem};

use super::{DateRange, Result};

/// Repository for the item catalog and its price history.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Gets a catalog item by its ID.
    async fn get_item(&self, id: Uuid) -> Result<Option<CatalogItem>>;

    /// Gets the catalog item with exactly this name.
    async fn find_item_by_name(&self, item_name: &str) -> Result<Option<CatalogItem>>;

    /// Gets every catalog item, ordered by name.
    async fn list_items(&self) -> Result<Vec<CatalogItem>>;

    /// Gets items whose name contains `keyword` ignoring case, most
    /// purchased first.
    async fn search_items(&self, keyword: &str, limit: usize) -> Result<Vec<CatalogItem>>;

    /// Creates a new item. Fails with `AlreadyExists` if the name is taken.
    async fn create_item(&self, item: &CatalogItem) -> Result<()>;

    /// Updates an existing item.
    async fn update_item(&self, item: &CatalogItem) -> Result<()>;

    /// Appends a price history entry.
    async fn append_price_history(&self, entry: &PriceHistoryEntry) -> Result<()>;

    /// Gets the price history of an item, newest purchase first.
    async fn get_price_history(&self, item_id: Uuid) -> Result<Vec<PriceHistoryEntry>>;
}

/// Repository for jobs.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Gets a job by its ID.
    async fn get_job(&self, id: Uuid) -> Result<Option<Job>>;

    /// Gets every job, ordered by name.
    async fn list_jobs(&self) -> Result<Vec<Job>>;

    /// Gets active jobs, ordered by name.
    async fn list_active_jobs(&self) -> Result<Vec<Job>>;

    /// Gets active jobs whose name or PO number contains `term` ignoring
    /// case.
    async fn search_active_jobs(&self, term: &str, limit: usize) -> Result<Vec<Job>>;

    /// Creates a new job.
    async fn create_job(&self, job: &Job) -> Result<()>;

    /// Updates an existing job.
    async fn update_job(&self, job: &Job) -> Result<()>;
}

/// Repository for the per-job facts the costing summary reads.
#[async_trait]
pub trait CostingRepository: Send + Sync {
    async fn get_estimates(&self, job_id: Uuid) -> Result<Vec<Estimate>>;

    async fn get_job_costs(&self, job_id: Uuid) -> Result<Vec<JobCostRecord>>;

    async fn get_job_labor(&self, job_id: Uuid) -> Result<Vec<JobLaborRecord>>;

    async fn get_job_revenue(&self, job_id: Uuid) -> Result<Vec<JobRevenueRecord>>;

    async fn create_estimate(&self, estimate: &Estimate) -> Result<()>;

    async fn create_job_cost(&self, cost: &JobCostRecord) -> Result<()>;

    async fn create_job_labor(&self, labor: &JobLaborRecord) -> Result<()>;

    async fn create_job_revenue(&self, revenue: &JobRevenueRecord) -> Result<()>;
}

/// Repository for date-windowed reads across the whole company.
///
/// Both bounds of every range are inclusive.
#[async_trait]
pub trait ReportingRepository: Send + Sync {
    /// Gets invoices by invoice date.
    async fn get_invoices_in_range(&self, range: DateRange) -> Result<Vec<Invoice>>;

    /// Gets job costs by cost date.
    async fn get_job_costs_in_range(&self, range: DateRange) -> Result<Vec<JobCostRecord>>;

    /// Gets labor records by work date.
    async fn get_job_labor_in_range(&self, range: DateRange) -> Result<Vec<JobLaborRecord>>;

    /// Gets receipts by receipt date, in insertion order.
    async fn get_receipts_in_range(&self, range: DateRange) -> Result<Vec<Receipt>>;
}

/// Repository for receipts and their lines.
#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    async fn get_receipt(&self, id: Uuid) -> Result<Option<Receipt>>;

    async fn create_receipt(&self, receipt: &Receipt) -> Result<()>;

    async fn create_line_items(&self, items: &[ReceiptLineItem]) -> Result<()>;

    async fn get_line_items(&self, receipt_id: Uuid) -> Result<Vec<ReceiptLineItem>>;
}

/// Repository for invoices and payments.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Gets an invoice by its ID.
    async fn get_invoice(&self, id: Uuid) -> Result<Option<Invoice>>;

    /// Gets invoices newest first, optionally filtered to numbers containing
    /// `search` ignoring case.
    async fn list_invoices(&self, search: Option<&str>, limit: usize) -> Result<Vec<Invoice>>;

    /// Gets the highest invoice number starting with `PREFIX-YEAR-`.
    async fn latest_invoice_number(&self, prefix: &str, year: i32) -> Result<Option<String>>;

    async fn create_invoice(&self, invoice: &Invoice) -> Result<()>;

    async fn update_invoice(&self, invoice: &Invoice) -> Result<()>;

    async fn create_payment(&self, payment: &InvoicePayment) -> Result<()>;

    /// Gets every payment recorded against an invoice, oldest first.
    async fn get_payments(&self, invoice_id: Uuid) -> Result<Vec<InvoicePayment>>;
}

/// Everything the portal needs from its data store.
pub trait DataStore:
    CatalogRepository
    + JobRepository
    + CostingRepository
    + ReportingRepository
    + ReceiptRepository
    + InvoiceRepository
{
}

impl<T> DataStore for T where
    T: CatalogRepository
        + JobRepository
        + CostingRepository
        + ReportingRepository
        + ReceiptRepository
        + InvoiceRepository
{
}
