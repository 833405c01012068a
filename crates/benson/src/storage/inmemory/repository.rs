//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use benson_core::costing::{Estimate, Job, JobCostRecord, JobLaborRecord, JobRevenueRecord};
use benson_core::invoicing::{invoice_sequence, Invoice, InvoicePayment};
use benson_core::ledger::{CatalogItem, PriceHistoryEntry};
use benson_core::receipts::{Receipt, ReceiptLineItem};
use benson_core::storage::{
    CatalogRepository, CostingRepository, DateRange, InvoiceRepository, JobRepository,
    ReceiptRepository, ReportingRepository, RepositoryError, Result,
};

/// In-memory storage backend for tests and the demo binary.
///
/// Entities keyed by ID live in HashMaps; append-only facts live in Vecs so
/// reads keep insertion order. Everything is wrapped in `Arc<RwLock<_>>`
/// and lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    items: Arc<RwLock<HashMap<Uuid, CatalogItem>>>,
    price_history: Arc<RwLock<Vec<PriceHistoryEntry>>>,
    jobs: Arc<RwLock<HashMap<Uuid, Job>>>,
    estimates: Arc<RwLock<Vec<Estimate>>>,
    job_costs: Arc<RwLock<Vec<JobCostRecord>>>,
    job_labor: Arc<RwLock<Vec<JobLaborRecord>>>,
    job_revenue: Arc<RwLock<Vec<JobRevenueRecord>>>,
    receipts: Arc<RwLock<Vec<Receipt>>>,
    line_items: Arc<RwLock<Vec<ReceiptLineItem>>>,
    invoices: Arc<RwLock<Vec<Invoice>>>,
    payments: Arc<RwLock<Vec<InvoicePayment>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[async_trait]
impl CatalogRepository for InMemoryRepository {
    async fn get_item(&self, id: Uuid) -> Result<Option<CatalogItem>> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn find_item_by_name(&self, item_name: &str) -> Result<Option<CatalogItem>> {
        let items = self.items.read().await;
        Ok(items.values().find(|i| i.item_name == item_name).cloned())
    }

    async fn list_items(&self) -> Result<Vec<CatalogItem>> {
        let items = self.items.read().await;
        let mut list: Vec<CatalogItem> = items.values().cloned().collect();
        list.sort_by(|a, b| a.item_name.cmp(&b.item_name));
        Ok(list)
    }

    async fn search_items(&self, keyword: &str, limit: usize) -> Result<Vec<CatalogItem>> {
        let needle = keyword.to_lowercase();
        let items = self.items.read().await;
        let mut found: Vec<CatalogItem> = items
            .values()
            .filter(|i| contains_ignore_case(&i.item_name, &needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.purchase_count
                .cmp(&a.purchase_count)
                .then_with(|| a.item_name.cmp(&b.item_name))
        });
        found.truncate(limit);
        Ok(found)
    }

    async fn create_item(&self, item: &CatalogItem) -> Result<()> {
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) || items.values().any(|i| i.item_name == item.item_name) {
            return Err(RepositoryError::already_exists("CatalogItem", &item.item_name));
        }
        items.insert(item.id, item.clone());
        Ok(())
    }

    async fn update_item(&self, item: &CatalogItem) -> Result<()> {
        let mut items = self.items.write().await;
        if !items.contains_key(&item.id) {
            return Err(RepositoryError::not_found("CatalogItem", item.id));
        }
        items.insert(item.id, item.clone());
        Ok(())
    }

    async fn append_price_history(&self, entry: &PriceHistoryEntry) -> Result<()> {
        let mut history = self.price_history.write().await;
        history.push(entry.clone());
        Ok(())
    }

    async fn get_price_history(&self, item_id: Uuid) -> Result<Vec<PriceHistoryEntry>> {
        let history = self.price_history.read().await;
        let mut entries: Vec<PriceHistoryEntry> = history
            .iter()
            .rev()
            .filter(|e| e.item_id == item_id)
            .cloned()
            .collect();
        // Undated entries sort last; `None < Some` so compare reversed.
        entries.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        Ok(entries)
    }
}

#[async_trait]
impl JobRepository for InMemoryRepository {
    async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(&id).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>> {
        let jobs = self.jobs.read().await;
        let mut list: Vec<Job> = jobs.values().cloned().collect();
        list.sort_by(|a, b| a.job_name.cmp(&b.job_name));
        Ok(list)
    }

    async fn list_active_jobs(&self) -> Result<Vec<Job>> {
        let mut list = self.list_jobs().await?;
        list.retain(Job::is_active);
        Ok(list)
    }

    async fn search_active_jobs(&self, term: &str, limit: usize) -> Result<Vec<Job>> {
        let needle = term.to_lowercase();
        let mut list = self.list_active_jobs().await?;
        list.retain(|job| {
            contains_ignore_case(&job.job_name, &needle)
                || job
                    .po_number
                    .as_deref()
                    .is_some_and(|po| contains_ignore_case(po, &needle))
        });
        list.truncate(limit);
        Ok(list)
    }

    async fn create_job(&self, job: &Job) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(RepositoryError::already_exists("Job", job.id));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn update_job(&self, job: &Job) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if !jobs.contains_key(&job.id) {
            return Err(RepositoryError::not_found("Job", job.id));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }
}

#[async_trait]
impl CostingRepository for InMemoryRepository {
    async fn get_estimates(&self, job_id: Uuid) -> Result<Vec<Estimate>> {
        let estimates = self.estimates.read().await;
        Ok(estimates.iter().filter(|e| e.job_id == job_id).cloned().collect())
    }

    async fn get_job_costs(&self, job_id: Uuid) -> Result<Vec<JobCostRecord>> {
        let costs = self.job_costs.read().await;
        Ok(costs.iter().filter(|c| c.job_id == job_id).cloned().collect())
    }

    async fn get_job_labor(&self, job_id: Uuid) -> Result<Vec<JobLaborRecord>> {
        let labor = self.job_labor.read().await;
        Ok(labor.iter().filter(|l| l.job_id == job_id).cloned().collect())
    }

    async fn get_job_revenue(&self, job_id: Uuid) -> Result<Vec<JobRevenueRecord>> {
        let revenue = self.job_revenue.read().await;
        Ok(revenue.iter().filter(|r| r.job_id == job_id).cloned().collect())
    }

    async fn create_estimate(&self, estimate: &Estimate) -> Result<()> {
        self.estimates.write().await.push(estimate.clone());
        Ok(())
    }

    async fn create_job_cost(&self, cost: &JobCostRecord) -> Result<()> {
        self.job_costs.write().await.push(cost.clone());
        Ok(())
    }

    async fn create_job_labor(&self, labor: &JobLaborRecord) -> Result<()> {
        self.job_labor.write().await.push(labor.clone());
        Ok(())
    }

    async fn create_job_revenue(&self, revenue: &JobRevenueRecord) -> Result<()> {
        self.job_revenue.write().await.push(revenue.clone());
        Ok(())
    }
}

#[async_trait]
impl ReportingRepository for InMemoryRepository {
    async fn get_invoices_in_range(&self, range: DateRange) -> Result<Vec<Invoice>> {
        let invoices = self.invoices.read().await;
        Ok(invoices
            .iter()
            .filter(|i| range.contains(i.invoice_date))
            .cloned()
            .collect())
    }

    async fn get_job_costs_in_range(&self, range: DateRange) -> Result<Vec<JobCostRecord>> {
        let costs = self.job_costs.read().await;
        Ok(costs
            .iter()
            .filter(|c| range.contains(c.cost_date))
            .cloned()
            .collect())
    }

    async fn get_job_labor_in_range(&self, range: DateRange) -> Result<Vec<JobLaborRecord>> {
        let labor = self.job_labor.read().await;
        Ok(labor
            .iter()
            .filter(|l| range.contains(l.work_date))
            .cloned()
            .collect())
    }

    async fn get_receipts_in_range(&self, range: DateRange) -> Result<Vec<Receipt>> {
        let receipts = self.receipts.read().await;
        Ok(receipts
            .iter()
            .filter(|r| r.receipt_date.is_some_and(|d| range.contains(d)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReceiptRepository for InMemoryRepository {
    async fn get_receipt(&self, id: Uuid) -> Result<Option<Receipt>> {
        let receipts = self.receipts.read().await;
        Ok(receipts.iter().find(|r| r.id == id).cloned())
    }

    async fn create_receipt(&self, receipt: &Receipt) -> Result<()> {
        let mut receipts = self.receipts.write().await;
        if receipts.iter().any(|r| r.id == receipt.id) {
            return Err(RepositoryError::already_exists("Receipt", receipt.id));
        }
        receipts.push(receipt.clone());
        Ok(())
    }

    async fn create_line_items(&self, items: &[ReceiptLineItem]) -> Result<()> {
        self.line_items.write().await.extend_from_slice(items);
        Ok(())
    }

    async fn get_line_items(&self, receipt_id: Uuid) -> Result<Vec<ReceiptLineItem>> {
        let line_items = self.line_items.read().await;
        Ok(line_items
            .iter()
            .filter(|l| l.receipt_id == receipt_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryRepository {
    async fn get_invoice(&self, id: Uuid) -> Result<Option<Invoice>> {
        let invoices = self.invoices.read().await;
        Ok(invoices.iter().find(|i| i.id == id).cloned())
    }

    async fn list_invoices(&self, search: Option<&str>, limit: usize) -> Result<Vec<Invoice>> {
        let needle = search.map(str::to_lowercase);
        let invoices = self.invoices.read().await;
        Ok(invoices
            .iter()
            .rev()
            .filter(|i| {
                needle
                    .as_deref()
                    .is_none_or(|n| contains_ignore_case(&i.invoice_number, n))
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn latest_invoice_number(&self, prefix: &str, year: i32) -> Result<Option<String>> {
        let invoices = self.invoices.read().await;
        Ok(invoices
            .iter()
            .filter_map(|i| {
                invoice_sequence(prefix, year, &i.invoice_number).map(|seq| (seq, i))
            })
            .max_by_key(|(seq, _)| *seq)
            .map(|(_, i)| i.invoice_number.clone()))
    }

    async fn create_invoice(&self, invoice: &Invoice) -> Result<()> {
        let mut invoices = self.invoices.write().await;
        if invoices
            .iter()
            .any(|i| i.id == invoice.id || i.invoice_number == invoice.invoice_number)
        {
            return Err(RepositoryError::already_exists("Invoice", &invoice.invoice_number));
        }
        invoices.push(invoice.clone());
        Ok(())
    }

    async fn update_invoice(&self, invoice: &Invoice) -> Result<()> {
        let mut invoices = self.invoices.write().await;
        let Some(existing) = invoices.iter_mut().find(|i| i.id == invoice.id) else {
            return Err(RepositoryError::not_found("Invoice", invoice.id));
        };
        *existing = invoice.clone();
        Ok(())
    }

    async fn create_payment(&self, payment: &InvoicePayment) -> Result<()> {
        self.payments.write().await.push(payment.clone());
        Ok(())
    }

    async fn get_payments(&self, invoice_id: Uuid) -> Result<Vec<InvoicePayment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .iter()
            .filter(|p| p.invoice_id == invoice_id)
            .cloned()
            .collect())
    }
}
