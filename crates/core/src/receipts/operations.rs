use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::error::ReceiptError;
use super::types::{Receipt, ReceiptDraft, ReceiptStatus};
use crate::costing::JobCostRecord;
use crate::ledger::{categorize_item, normalize_item_name, PurchaseLine};

/// Maximum number of active jobs proposed for a PO reference.
pub const JOB_MATCH_LIMIT: usize = 5;

static PO_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)PO-?(\d{4})").expect("Invalid PO reference regex")
});

/// Validates a draft and splits it into the receipt to persist and the
/// lines worth keeping.
///
/// A vendor and a non-zero total are required. The receipt is matched when
/// the draft names a job.
pub fn validate_draft(draft: ReceiptDraft) -> Result<(Receipt, Vec<PurchaseLine>), ReceiptError> {
    let vendor = draft.vendor_name.ok_or(ReceiptError::MissingVendor)?;
    let total = draft
        .total_amount
        .filter(|t| *t != 0.0)
        .ok_or(ReceiptError::MissingTotal)?;

    let mut receipt = Receipt::new(Some(vendor), draft.receipt_date, total);
    receipt.confidence_score = draft.confidence_score;
    if let Some(job_id) = draft.job_id {
        receipt = receipt.with_job(job_id);
    }

    Ok((receipt, valid_lines(draft.line_items)))
}

/// Keeps lines with a non-blank name, trimming the name.
pub fn valid_lines(lines: Vec<PurchaseLine>) -> Vec<PurchaseLine> {
    lines
        .into_iter()
        .filter_map(|mut line| {
            let name = normalize_item_name(&line.item_name)?.to_string();
            line.item_name = name;
            Some(line)
        })
        .collect()
}

/// Builds one job cost per line for a receipt attached to a job.
///
/// Unmatched receipts yield nothing. Costs are dated on the receipt date,
/// or `today` when the receipt has none.
pub fn job_costs_for_receipt(
    receipt: &Receipt,
    lines: &[PurchaseLine],
    today: NaiveDate,
) -> Vec<JobCostRecord> {
    let Some(job_id) = receipt.job_id.filter(|_| receipt.status == ReceiptStatus::Matched) else {
        return Vec::new();
    };
    let vendor = receipt.vendor_name.as_deref().unwrap_or("Unknown");
    let cost_date = receipt.receipt_date.unwrap_or(today);

    lines
        .iter()
        .map(|line| {
            JobCostRecord::new(
                job_id,
                categorize_item(&line.item_name).as_str(),
                format!("{} ({vendor})", line.item_name),
                line.total_cost,
                cost_date,
            )
            .from_receipt(receipt.id)
        })
        .collect()
}

/// Finds the first purchase-order reference (`PO-1234` or `PO1234`) in free
/// text and returns its four digits.
///
/// OCR text often runs words together, so the reference may start mid-word.
pub fn find_po_reference(text: &str) -> Option<String> {
    PO_REFERENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
