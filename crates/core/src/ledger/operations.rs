//! Pure operations on catalog items.

use super::types::{IngestSummary, LineOutcome};

/// Relative deviation from the average unit cost worth flagging.
pub const PRICE_VARIANCE_THRESHOLD: f64 = 0.10;

/// Maximum number of items returned by a catalog search.
pub const SEARCH_LIMIT: usize = 10;

/// Keywords shorter than this return no results.
pub const SEARCH_MIN_KEYWORD_LEN: usize = 2;

/// Normalizes an item name for catalog lookup.
///
/// Only surrounding whitespace is dropped; comparison stays case-sensitive.
/// Returns `None` for names that are blank after trimming.
pub fn normalize_item_name(name: &str) -> Option<&str> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Returns true when `price` deviates from `average` by more than 10%.
///
/// An item without a meaningful average never warns.
pub fn price_variance_exceeds(average: f64, price: f64) -> bool {
    if average <= 0.0 {
        return false;
    }
    ((price - average) / average).abs() > PRICE_VARIANCE_THRESHOLD
}

/// Counts successful lines, ignoring failures.
pub fn summarize_outcomes<'a, E: 'a>(
    outcomes: impl IntoIterator<Item = &'a Result<LineOutcome, E>>,
) -> IngestSummary {
    outcomes
        .into_iter()
        .fold(IngestSummary::default(), |mut summary, outcome| {
            match outcome {
                Ok(LineOutcome::Added(_)) => summary.added += 1,
                Ok(LineOutcome::Updated(_)) => summary.updated += 1,
                Err(_) => {}
            }
            summary
        })
}
