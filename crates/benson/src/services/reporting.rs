//! Company-level reports.

use std::sync::Arc;

use benson_core::costing::Job;
use benson_core::reporting::{build_financial_summary, vendor_spend, CompanyFinancialSummary, VendorSpend};
use benson_core::storage::{DateRange, JobRepository, ReportingRepository, Result};

/// Aggregations across every job for a date window.
pub struct Reporting<R> {
    repository: Arc<R>,
}

impl<R> Reporting<R>
where
    R: ReportingRepository + JobRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Revenue, costs and a month-by-month series for `range`.
    ///
    /// The three sources load concurrently; if any fails the whole report
    /// fails.
    pub async fn financial_report(&self, range: DateRange) -> Result<CompanyFinancialSummary> {
        let (invoices, costs, labor) = tokio::try_join!(
            self.repository.get_invoices_in_range(range),
            self.repository.get_job_costs_in_range(range),
            self.repository.get_job_labor_in_range(range),
        )?;

        tracing::debug!(
            start = %range.start,
            end = %range.end,
            invoices = invoices.len(),
            costs = costs.len(),
            labor = labor.len(),
            "Building financial report"
        );
        Ok(build_financial_summary(&range, &invoices, &costs, &labor))
    }

    /// Receipt spend per vendor in `range`, biggest spender first.
    pub async fn vendor_analysis(&self, range: DateRange) -> Result<Vec<VendorSpend>> {
        let receipts = self.repository.get_receipts_in_range(range).await?;
        Ok(vendor_spend(&range, &receipts))
    }

    /// The jobs currently in progress.
    pub async fn job_performance(&self) -> Result<Vec<Job>> {
        self.repository.list_active_jobs().await
    }
}
