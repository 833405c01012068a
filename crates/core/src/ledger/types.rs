use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::serde::{deserialize_amount, deserialize_optional_amount};

/// Category assigned to items first seen on a receipt.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// The deduplicated running-statistics record for a distinct item name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: Uuid,
    pub item_name: String,
    pub category: String,
    /// Vendor of the receipt that introduced the item.
    pub preferred_vendor: Option<String>,
    pub last_unit_cost: f64,
    /// Weighted mean of every recorded unit cost.
    pub average_unit_cost: f64,
    pub min_unit_cost: f64,
    pub max_unit_cost: f64,
    pub last_purchased_date: Option<NaiveDate>,
    pub purchase_count: u32,
}

impl CatalogItem {
    /// Creates the catalog record for an item seen for the first time.
    pub fn first_purchase(
        item_name: impl Into<String>,
        vendor: Option<&str>,
        unit_cost: f64,
        purchased_on: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_name: item_name.into(),
            category: UNCATEGORIZED.to_string(),
            preferred_vendor: vendor.map(str::to_string),
            last_unit_cost: unit_cost,
            average_unit_cost: unit_cost,
            min_unit_cost: unit_cost,
            max_unit_cost: unit_cost,
            last_purchased_date: purchased_on,
            purchase_count: 1,
        }
    }

    /// Folds one more purchase into the running statistics.
    ///
    /// The average stays the weighted mean over all purchases and the
    /// min/max bounds only ever widen.
    pub fn record_purchase(&mut self, unit_cost: f64, purchased_on: Option<NaiveDate>) {
        if self.purchase_count == 0 {
            self.min_unit_cost = unit_cost;
            self.max_unit_cost = unit_cost;
            self.average_unit_cost = 0.0;
        }

        let old_count = f64::from(self.purchase_count);
        let new_count = self.purchase_count + 1;

        self.average_unit_cost =
            (self.average_unit_cost * old_count + unit_cost) / f64::from(new_count);
        self.min_unit_cost = self.min_unit_cost.min(unit_cost);
        self.max_unit_cost = self.max_unit_cost.max(unit_cost);
        self.last_unit_cost = unit_cost;
        self.last_purchased_date = purchased_on;
        self.purchase_count = new_count;
    }

    /// Sets a specific ID for this item (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the category for this item.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// One recorded purchase price of a catalog item. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub id: Uuid,
    pub item_id: Uuid,
    pub vendor_name: Option<String>,
    pub unit_cost: f64,
    pub purchase_date: Option<NaiveDate>,
    pub receipt_id: Uuid,
}

impl PriceHistoryEntry {
    pub fn new(
        item_id: Uuid,
        vendor: Option<&str>,
        unit_cost: f64,
        purchase_date: Option<NaiveDate>,
        receipt_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            vendor_name: vendor.map(str::to_string),
            unit_cost,
            purchase_date,
            receipt_id,
        }
    }
}

/// A purchased line as entered or extracted from a receipt.
///
/// A line without a usable `total_cost` gets `quantity * unit_cost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPurchaseLine")]
pub struct PurchaseLine {
    pub item_name: String,
    pub quantity: f64,
    pub unit_cost: f64,
    pub total_cost: f64,
}

#[derive(Deserialize)]
struct RawPurchaseLine {
    #[serde(default)]
    item_name: String,
    #[serde(default = "default_quantity", deserialize_with = "deserialize_amount")]
    quantity: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    unit_cost: f64,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    total_cost: Option<f64>,
}

fn default_quantity() -> f64 {
    1.0
}

impl From<RawPurchaseLine> for PurchaseLine {
    fn from(raw: RawPurchaseLine) -> Self {
        Self {
            total_cost: raw.total_cost.unwrap_or(raw.quantity * raw.unit_cost),
            item_name: raw.item_name,
            quantity: raw.quantity,
            unit_cost: raw.unit_cost,
        }
    }
}

impl PurchaseLine {
    /// Creates a line whose total is `quantity * unit_cost`.
    pub fn new(item_name: impl Into<String>, quantity: f64, unit_cost: f64) -> Self {
        Self {
            item_name: item_name.into(),
            quantity,
            unit_cost,
            total_cost: quantity * unit_cost,
        }
    }
}

/// What happened to the catalog for one successfully processed line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Added(CatalogItem),
    Updated(CatalogItem),
}

impl LineOutcome {
    pub fn item(&self) -> &CatalogItem {
        match self {
            LineOutcome::Added(item) | LineOutcome::Updated(item) => item,
        }
    }
}

/// Batch counts reported after ingesting a receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub added: usize,
    pub updated: usize,
}
