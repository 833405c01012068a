//! Pure pattern matching functions for cache keys.
//!
//! Patterns are globs where `*` matches any run of characters, including
//! the empty run. There is no escaping; cache keys never contain `*`.

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use benson_core::cache::pattern_matches;
///
/// assert!(pattern_matches("jobs_list", "jobs_list"));
/// assert!(pattern_matches("jobs_list*", "jobs_list:costing"));
/// assert!(pattern_matches("*report_*", "report_financial:2024-01-01:2024-03-31"));
/// assert!(!pattern_matches("item_library*", "invoices_list"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let mut pieces = pattern.split('*');

    // `split` always yields at least one piece.
    let head = pieces.next().unwrap_or_default();
    let Some(mut rest) = key.strip_prefix(head) else {
        return false;
    };

    let tail: Vec<&str> = pieces.collect();
    let Some((last, middle)) = tail.split_last() else {
        // No wildcard at all: the prefix must have consumed the whole key.
        return rest.is_empty();
    };

    for piece in middle.iter().filter(|p| !p.is_empty()) {
        match rest.find(piece) {
            Some(pos) => rest = &rest[pos + piece.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}

/// Builds the glob equivalent of "key contains `fragment`".
pub fn substring_pattern(fragment: &str) -> String {
    format!("*{fragment}*")
}
