//! Receipt intake: persistence, ledger update and job cost posting.

use std::sync::Arc;

use chrono::NaiveDate;

use benson_core::cache::MutationEvent;
use benson_core::costing::{Job, JobCostRecord};
use benson_core::ledger::PurchaseLine;
use benson_core::receipts::{
    find_po_reference, job_costs_for_receipt, validate_draft, Receipt, ReceiptDraft,
    ReceiptLineItem, JOB_MATCH_LIMIT,
};
use benson_core::storage::{CatalogRepository, CostingRepository, JobRepository, ReceiptRepository};

use super::ledger::{ItemLedger, LedgerReport};
use crate::error::Result;

/// Everything a successful save produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedReceipt {
    pub receipt: Receipt,
    pub ledger: LedgerReport,
    pub job_costs: Vec<JobCostRecord>,
}

impl SavedReceipt {
    /// The cache evictions this save calls for.
    pub fn events(&self) -> Vec<MutationEvent> {
        receipt_events(&self.receipt)
    }
}

/// The cache evictions storing `receipt` calls for, whether or not every
/// write after the receipt row went through.
pub fn receipt_events(receipt: &Receipt) -> Vec<MutationEvent> {
    let mut events = vec![MutationEvent::ReceiptIngested];
    if let Some(job_id) = receipt.job_id {
        events.push(MutationEvent::JobChanged {
            job_id: Some(job_id),
        });
    }
    events.push(MutationEvent::ReportsChanged);
    events
}

pub struct ReceiptIntake<R> {
    repository: Arc<R>,
    ledger: ItemLedger<R>,
}

impl<R> ReceiptIntake<R>
where
    R: ReceiptRepository + CatalogRepository + CostingRepository + JobRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            ledger: ItemLedger::new(repository.clone()),
            repository,
        }
    }

    /// Saves a reviewed receipt draft.
    ///
    /// The receipt and its lines are stored first, then every line is fed to
    /// the item ledger. A receipt attached to a job also posts one job cost
    /// per line, dated on the receipt or on `today`.
    pub async fn save(&self, draft: ReceiptDraft, today: NaiveDate) -> Result<SavedReceipt> {
        let (receipt, lines) = self.prepare(draft)?;
        self.store(receipt, lines, today).await
    }

    /// Validates a draft into the receipt and lines [`store`](Self::store)
    /// writes. Touches nothing.
    pub fn prepare(&self, draft: ReceiptDraft) -> Result<(Receipt, Vec<PurchaseLine>)> {
        Ok(validate_draft(draft)?)
    }

    /// Writes a validated receipt.
    ///
    /// An error after the receipt row went in leaves the earlier writes in
    /// place; the caller still owes the evictions of [`receipt_events`].
    pub async fn store(
        &self,
        receipt: Receipt,
        lines: Vec<PurchaseLine>,
        today: NaiveDate,
    ) -> Result<SavedReceipt> {
        self.repository.create_receipt(&receipt).await?;
        let line_items: Vec<ReceiptLineItem> = lines
            .iter()
            .map(|line| ReceiptLineItem::from_line(receipt.id, line))
            .collect();
        if !line_items.is_empty() {
            self.repository.create_line_items(&line_items).await?;
        }

        let ledger = self
            .ledger
            .ingest(
                receipt.id,
                &lines,
                receipt.vendor_name.as_deref(),
                receipt.receipt_date,
            )
            .await;

        let job_costs = job_costs_for_receipt(&receipt, &lines, today);
        for cost in &job_costs {
            self.repository.create_job_cost(cost).await?;
        }

        tracing::info!(
            receipt_id = %receipt.id,
            status = receipt.status.as_str(),
            lines = line_items.len(),
            job_costs = job_costs.len(),
            "Receipt saved"
        );

        Ok(SavedReceipt {
            receipt,
            ledger,
            job_costs,
        })
    }

    /// Suggests active jobs for a receipt from its extracted text.
    ///
    /// A purchase-order reference narrows the search to jobs whose name or
    /// PO number mention it; otherwise any active jobs are offered.
    pub async fn suggest_jobs(&self, extracted_text: &str) -> Result<Vec<Job>> {
        let term = find_po_reference(extracted_text).unwrap_or_default();
        Ok(self
            .repository
            .search_active_jobs(&term, JOB_MATCH_LIMIT)
            .await?)
    }
}
