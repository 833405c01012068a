//! Portal state: services behind a shared response cache.
//!
//! Every read goes through [`CachedFetch`] under a typed [`CacheKey`], and
//! every write reports the [`MutationEvent`]s it caused to the
//! [`Invalidator`], which evicts the affected key families.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use uuid::Uuid;

use benson_core::cache::{Cache, CacheKey, MutationEvent};
use benson_core::costing::{
    CostBreakdown, Estimate, Job, JobCostRecord, JobCostingRow, JobCostingSummary, JobLaborRecord,
    JobRevenueRecord,
};
use benson_core::invoicing::{Invoice, DEFAULT_INVOICE_PREFIX};
use benson_core::ledger::{CatalogItem, PriceHistoryEntry};
use benson_core::receipts::ReceiptDraft;
use benson_core::reporting::{CompanyFinancialSummary, VendorSpend};
use benson_core::storage::{DataStore, DateRange};

use crate::cache::{FileStore, MemoryStore, TtlCache};
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{CachedFetch, Fetched};
use crate::invalidation::Invalidator;
use crate::services::{
    receipt_events, InvoiceLedger, ItemLedger, JobCosting, NewInvoice, PaymentEntry,
    ReceiptIntake, Reporting, SavedReceipt,
};

/// Maps an empty list to "no data".
fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Builds the response cache described by `config`.
///
/// With `cache_file` set the cache persists to that file, otherwise it lives
/// in an LRU-bounded in-memory store.
pub fn build_cache(config: &Config) -> anyhow::Result<Arc<dyn Cache>> {
    let cache: Arc<dyn Cache> = match &config.cache_file {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Using file-backed cache");
            Arc::new(TtlCache::new(
                Arc::new(FileStore::open(path)?),
                config.cache_prefix.as_str(),
            ))
        }
        None => Arc::new(TtlCache::new(
            Arc::new(MemoryStore::new(config.cache_max_entries)),
            config.cache_prefix.as_str(),
        )),
    };
    Ok(cache)
}

/// The application facade used by the CLI.
pub struct Portal<R> {
    repository: Arc<R>,
    fetch: CachedFetch,
    invalidator: Invalidator,
    ledger: ItemLedger<R>,
    costing: JobCosting<R>,
    reporting: Reporting<R>,
    receipts: ReceiptIntake<R>,
    invoices: InvoiceLedger<R>,
    cache_ttl: Duration,
    dashboard_ttl: Duration,
}

impl<R: DataStore + 'static> Portal<R> {
    pub fn new(repository: Arc<R>, cache: Arc<dyn Cache>, config: &Config) -> Self {
        Self {
            fetch: CachedFetch::new(cache.clone(), config.instrumentation()),
            invalidator: Invalidator::new(cache),
            ledger: ItemLedger::new(repository.clone()),
            costing: JobCosting::new(repository.clone(), config.costing_policy()),
            reporting: Reporting::new(repository.clone()),
            receipts: ReceiptIntake::new(repository.clone()),
            invoices: InvoiceLedger::new(repository.clone(), DEFAULT_INVOICE_PREFIX),
            repository,
            cache_ttl: config.cache_ttl(),
            dashboard_ttl: config.dashboard_ttl(),
        }
    }

    // ------------------------------------------------------------------
    // Jobs
    // ------------------------------------------------------------------

    pub async fn jobs(&self) -> Result<Fetched<Vec<Job>>> {
        self.fetch
            .with_cache(&CacheKey::JobsList, self.cache_ttl, move || async move {
                Ok(non_empty(self.repository.list_jobs().await?))
            })
            .await
    }

    pub async fn job(&self, job_id: Uuid) -> Result<Fetched<Job>> {
        self.fetch
            .with_cache(&CacheKey::Job(job_id), self.cache_ttl, move || async move {
                Ok(self.repository.get_job(job_id).await?)
            })
            .await
    }

    /// Active jobs with their costing summaries, cached for the longer
    /// dashboard TTL.
    pub async fn active_jobs_costing(&self) -> Result<Fetched<Vec<JobCostingRow>>> {
        self.fetch
            .with_cache(&CacheKey::ActiveJobsCosting, self.dashboard_ttl, move || async move {
                Ok(non_empty(self.costing.active_jobs_costing().await?))
            })
            .await
    }

    pub async fn job_summary(&self, job_id: Uuid) -> Result<Fetched<JobCostingSummary>> {
        self.fetch
            .with_cache(&CacheKey::JobCostingSummary(job_id), self.cache_ttl, move || async move {
                Ok(Some(self.costing.summarize(job_id).await?))
            })
            .await
    }

    pub async fn job_breakdown(&self, job_id: Uuid) -> Result<Fetched<CostBreakdown>> {
        self.fetch
            .with_cache(&CacheKey::JobCostBreakdown(job_id), self.cache_ttl, move || async move {
                Ok(Some(self.costing.breakdown(job_id).await?))
            })
            .await
    }

    pub async fn create_job(&self, job: &Job) -> Result<()> {
        self.repository.create_job(job).await?;
        self.job_changed(job.id).await;
        Ok(())
    }

    pub async fn update_job(&self, job: &Job) -> Result<()> {
        self.repository.update_job(job).await?;
        self.job_changed(job.id).await;
        Ok(())
    }

    pub async fn record_estimate(&self, estimate: &Estimate) -> Result<()> {
        self.costing.record_estimate(estimate).await?;
        self.job_changed(estimate.job_id).await;
        Ok(())
    }

    pub async fn record_job_cost(&self, cost: &JobCostRecord) -> Result<()> {
        self.costing.record_job_cost(cost).await?;
        self.job_changed(cost.job_id).await;
        Ok(())
    }

    pub async fn record_labor(&self, labor: &JobLaborRecord) -> Result<()> {
        self.costing.record_labor(labor).await?;
        self.job_changed(labor.job_id).await;
        Ok(())
    }

    pub async fn record_revenue(&self, revenue: &JobRevenueRecord) -> Result<()> {
        self.costing.record_revenue(revenue).await?;
        self.job_changed(revenue.job_id).await;
        Ok(())
    }

    async fn job_changed(&self, job_id: Uuid) {
        self.invalidator
            .apply(&[
                MutationEvent::JobChanged {
                    job_id: Some(job_id),
                },
                MutationEvent::ReportsChanged,
            ])
            .await;
    }

    // ------------------------------------------------------------------
    // Invoices
    // ------------------------------------------------------------------

    pub async fn invoices(&self, search: Option<&str>) -> Result<Fetched<Vec<Invoice>>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let key = match search {
            Some(term) => CacheKey::InvoiceSearch(term.to_string()),
            None => CacheKey::InvoicesList,
        };
        self.fetch
            .with_cache(&key, self.cache_ttl, move || async move {
                Ok(non_empty(self.invoices.list(search).await?))
            })
            .await
    }

    pub async fn invoice(&self, invoice_id: Uuid) -> Result<Fetched<Invoice>> {
        self.fetch
            .with_cache(&CacheKey::Invoice(invoice_id), self.cache_ttl, move || async move {
                self.invoices.get(invoice_id).await
            })
            .await
    }

    pub async fn issue_invoice(&self, new: NewInvoice) -> Result<Invoice> {
        let invoice = self.invoices.issue(new).await?;
        self.invoice_changed(invoice.id).await;
        Ok(invoice)
    }

    pub async fn record_payment(&self, invoice_id: Uuid, entry: PaymentEntry) -> Result<Invoice> {
        let invoice = self.invoices.record_payment(invoice_id, entry).await?;
        self.invoice_changed(invoice_id).await;
        Ok(invoice)
    }

    async fn invoice_changed(&self, invoice_id: Uuid) {
        self.invalidator
            .apply(&[
                MutationEvent::InvoiceChanged {
                    invoice_id: Some(invoice_id),
                },
                MutationEvent::ReportsChanged,
            ])
            .await;
    }

    // ------------------------------------------------------------------
    // Items and receipts
    // ------------------------------------------------------------------

    pub async fn item_library(&self) -> Result<Fetched<Vec<CatalogItem>>> {
        self.fetch
            .with_cache(&CacheKey::ItemLibrary, self.cache_ttl, move || async move {
                Ok(non_empty(self.ledger.list().await?))
            })
            .await
    }

    pub async fn search_items(&self, keyword: &str) -> Result<Fetched<Vec<CatalogItem>>> {
        let keyword = keyword.trim();
        self.fetch
            .with_cache(
                &CacheKey::ItemSearch(keyword.to_string()),
                self.cache_ttl,
                move || async move { Ok(non_empty(self.ledger.search(keyword).await?)) },
            )
            .await
    }

    pub async fn item_history(&self, item_id: Uuid) -> Result<Fetched<Vec<PriceHistoryEntry>>> {
        self.fetch
            .with_cache(&CacheKey::ItemHistory(item_id), self.cache_ttl, move || async move {
                Ok(non_empty(self.ledger.price_history(item_id).await?))
            })
            .await
    }

    /// Whether `price` strays from the item's running average. Never cached.
    pub async fn price_warning(&self, item_name: &str, price: f64) -> Result<bool> {
        Ok(self.ledger.price_warning(item_name, price).await?)
    }

    /// Saves a receipt draft and evicts everything it may have changed.
    ///
    /// A draft that fails validation evicts nothing. Once storing starts the
    /// evictions happen even if a later write fails, since the receipt and
    /// part of its ledger and job costs may already be in the store.
    pub async fn save_receipt(&self, draft: ReceiptDraft, today: NaiveDate) -> Result<SavedReceipt> {
        let (receipt, lines) = self.receipts.prepare(draft)?;
        let events = receipt_events(&receipt);
        let result = self.receipts.store(receipt, lines, today).await;
        self.invalidator.apply(&events).await;
        result
    }

    /// Active jobs a receipt may belong to. Never cached.
    pub async fn suggest_jobs(&self, extracted_text: &str) -> Result<Vec<Job>> {
        self.receipts.suggest_jobs(extracted_text).await
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    pub async fn financial_report(
        &self,
        range: DateRange,
    ) -> Result<Fetched<CompanyFinancialSummary>> {
        self.fetch
            .with_cache(&CacheKey::FinancialReport(range), self.cache_ttl, move || async move {
                Ok(Some(self.reporting.financial_report(range).await?))
            })
            .await
    }

    pub async fn vendor_analysis(&self, range: DateRange) -> Result<Fetched<Vec<VendorSpend>>> {
        self.fetch
            .with_cache(&CacheKey::VendorAnalysis(range), self.cache_ttl, move || async move {
                Ok(non_empty(self.reporting.vendor_analysis(range).await?))
            })
            .await
    }

    pub async fn job_performance(&self) -> Result<Fetched<Vec<Job>>> {
        self.fetch
            .with_cache(&CacheKey::JobPerformanceReport, self.cache_ttl, move || async move {
                Ok(non_empty(self.reporting.job_performance().await?))
            })
            .await
    }

    /// Drops cached responses whose key matches `pattern`, or every cached
    /// response without one.
    pub async fn clear_cache(&self, pattern: Option<&str>) {
        self.invalidator.clear(pattern.unwrap_or("*")).await;
    }
}
