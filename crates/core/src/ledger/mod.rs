//! Item price ledger: running cost statistics per catalog item.

mod categorize;
mod error;
mod operations;
mod types;

pub use categorize::categorize_item;
pub use error::LedgerError;
pub use operations::{
    normalize_item_name, price_variance_exceeds, summarize_outcomes, PRICE_VARIANCE_THRESHOLD,
    SEARCH_LIMIT, SEARCH_MIN_KEYWORD_LEN,
};
pub use types::{
    CatalogItem, IngestSummary, LineOutcome, PriceHistoryEntry, PurchaseLine,
    UNCATEGORIZED,
};
