use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::receipts::Receipt;
use crate::storage::DateRange;

/// Vendor name used for receipts without one.
pub const UNKNOWN_VENDOR: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorSpend {
    pub vendor: String,
    pub total_spent: f64,
    pub count: usize,
}

/// Groups receipts dated inside `range` by vendor, largest spend first.
///
/// Vendors with equal spend keep the order in which they first appear in
/// `receipts`. Undated receipts are never inside a range.
pub fn vendor_spend(range: &DateRange, receipts: &[Receipt]) -> Vec<VendorSpend> {
    let mut spend: Vec<VendorSpend> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let in_range = receipts
        .iter()
        .filter(|r| r.receipt_date.is_some_and(|d| range.contains(d)));

    for receipt in in_range {
        let vendor = receipt
            .vendor_name
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN_VENDOR);

        let slot = *index.entry(vendor.to_string()).or_insert_with(|| {
            spend.push(VendorSpend {
                vendor: vendor.to_string(),
                total_spent: 0.0,
                count: 0,
            });
            spend.len() - 1
        });
        spend[slot].total_spent += receipt.total_amount;
        spend[slot].count += 1;
    }

    spend.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    spend
}
