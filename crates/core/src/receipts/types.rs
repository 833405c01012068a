use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::PurchaseLine;
use crate::serde::{deserialize_optional_amount, deserialize_optional_date, deserialize_optional_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    /// Attached to a job.
    Matched,
    Unmatched,
}

impl ReceiptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatus::Matched => "matched",
            ReceiptStatus::Unmatched => "unmatched",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "matched" => Some(ReceiptStatus::Matched),
            "unmatched" => Some(ReceiptStatus::Unmatched),
            _ => None,
        }
    }
}

/// A saved purchase event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub vendor_name: Option<String>,
    pub receipt_date: Option<NaiveDate>,
    pub total_amount: f64,
    pub job_id: Option<Uuid>,
    pub confidence_score: Option<f64>,
    pub status: ReceiptStatus,
}

impl Receipt {
    pub fn new(vendor_name: Option<String>, receipt_date: Option<NaiveDate>, total_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            vendor_name,
            receipt_date,
            total_amount,
            job_id: None,
            confidence_score: None,
            status: ReceiptStatus::Unmatched,
        }
    }

    /// Attaches the receipt to a job, marking it matched.
    pub fn with_job(mut self, job_id: Uuid) -> Self {
        self.job_id = Some(job_id);
        self.status = ReceiptStatus::Matched;
        self
    }

    /// Sets a specific ID for this receipt (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// A persisted line of a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLineItem {
    pub id: Uuid,
    pub receipt_id: Uuid,
    pub item_name: String,
    pub quantity: f64,
    pub unit_cost: f64,
    pub total_cost: f64,
}

impl ReceiptLineItem {
    pub fn from_line(receipt_id: Uuid, line: &PurchaseLine) -> Self {
        Self {
            id: Uuid::new_v4(),
            receipt_id,
            item_name: line.item_name.clone(),
            quantity: line.quantity,
            unit_cost: line.unit_cost,
            total_cost: line.total_cost,
        }
    }
}

/// A receipt as captured by a form or an extraction step, before
/// validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReceiptDraft {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub vendor_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub receipt_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub job_id: Option<Uuid>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub line_items: Vec<PurchaseLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_job_marks_matched() {
        let job_id = Uuid::new_v4();
        let receipt = Receipt::new(Some("Home Depot".to_string()), None, 20.0).with_job(job_id);

        assert_eq!(receipt.status, ReceiptStatus::Matched);
        assert_eq!(receipt.job_id, Some(job_id));
    }

    #[test]
    fn test_draft_from_form_json() {
        let json = r#"{
            "vendor_name": "Home Depot",
            "receipt_date": "2024-05-01",
            "total_amount": "6.50",
            "line_items": [
                {"item_name": "2x4 Lumber", "quantity": 1, "unit_cost": 6.5, "total_cost": 6.5},
                {"item_name": "", "unit_cost": ""}
            ]
        }"#;

        let draft: ReceiptDraft = serde_json::from_str(json).unwrap();

        assert_eq!(draft.vendor_name.as_deref(), Some("Home Depot"));
        assert_eq!(draft.receipt_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(draft.total_amount, Some(6.5));
        assert_eq!(draft.job_id, None);
        assert_eq!(draft.line_items.len(), 2);
    }

    #[test]
    fn test_line_item_copies_line() {
        let receipt_id = Uuid::new_v4();
        let line = PurchaseLine::new("Screws", 2.0, 4.25);

        let item = ReceiptLineItem::from_line(receipt_id, &line);

        assert_eq!(item.receipt_id, receipt_id);
        assert_eq!(item.item_name, "Screws");
        assert_eq!(item.total_cost, 8.5);
    }
}
