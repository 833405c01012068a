//! Serde helper functions for lenient receipt and form deserialization.
//!
//! Receipt drafts arrive from hand-filled forms or from an extraction step,
//! so amounts may be numbers, numeric strings, empty strings or null, and
//! optional text may be blank.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    fn parse(self) -> Option<f64> {
        match self {
            RawAmount::Number(n) => Some(n),
            RawAmount::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize an optional NaiveDate, treating empty strings as None.
/// Expects format: YYYY-MM-DD
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Deserialize an amount, falling back to 0 for null, blank or
/// unparseable input.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawAmount> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(RawAmount::parse).unwrap_or(0.0))
}

/// Deserialize an optional amount, treating null, blank or unparseable
/// input as None.
pub fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawAmount> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(RawAmount::parse))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Draft {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        vendor: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_date")]
        date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "deserialize_amount")]
        cost: f64,
        #[serde(default, deserialize_with = "deserialize_optional_amount")]
        total: Option<f64>,
    }

    #[test]
    fn test_optional_string_blank_is_none() {
        let draft: Draft = serde_json::from_str(r#"{"vendor": "   "}"#).unwrap();
        assert_eq!(draft.vendor, None);

        let draft: Draft = serde_json::from_str(r#"{"vendor": "Home Depot"}"#).unwrap();
        assert_eq!(draft.vendor.as_deref(), Some("Home Depot"));
    }

    #[test]
    fn test_optional_date() {
        let draft: Draft = serde_json::from_str(r#"{"date": "2024-05-01"}"#).unwrap();
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 5, 1));

        let draft: Draft = serde_json::from_str(r#"{"date": ""}"#).unwrap();
        assert_eq!(draft.date, None);
    }

    #[test]
    fn test_optional_date_invalid() {
        let result: Result<Draft, _> = serde_json::from_str(r#"{"date": "05/01/2024"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_amount_accepts_numbers_and_strings() {
        let draft: Draft = serde_json::from_str(r#"{"cost": 12.5}"#).unwrap();
        assert_eq!(draft.cost, 12.5);

        let draft: Draft = serde_json::from_str(r#"{"cost": " 3.75 "}"#).unwrap();
        assert_eq!(draft.cost, 3.75);
    }

    #[test]
    fn test_amount_falls_back_to_zero() {
        for json in [r#"{"cost": null}"#, r#"{"cost": ""}"#, r#"{"cost": "n/a"}"#, "{}"] {
            let draft: Draft = serde_json::from_str(json).unwrap();
            assert_eq!(draft.cost, 0.0, "input: {json}");
        }
    }

    #[test]
    fn test_optional_amount() {
        let draft: Draft = serde_json::from_str(r#"{"total": "84.10"}"#).unwrap();
        assert_eq!(draft.total, Some(84.10));

        let draft: Draft = serde_json::from_str(r#"{"total": ""}"#).unwrap();
        assert_eq!(draft.total, None);

        let draft: Draft = serde_json::from_str("{}").unwrap();
        assert_eq!(draft.total, None);
    }
}
