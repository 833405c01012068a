use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::DateRangeError;

/// A date range with inclusive start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Creates a date range covering an entire calendar month.
    pub fn month(year: i32, month: u32) -> Result<Self, DateRangeError> {
        let invalid = DateRangeError::InvalidMonth { year, month };
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or(invalid.clone())?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end = next.and_then(|d| d.pred_opt()).ok_or(invalid)?;
        Ok(Self { start, end })
    }

    /// Creates the range from January 1st of `today`'s year through `today`.
    pub fn year_to_date(today: NaiveDate) -> Self {
        let start = today.with_ordinal(1).unwrap_or(today);
        Self { start, end: today }
    }

    /// Returns true if `date` falls inside the range (both bounds inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_valid_range_construction() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 1, 31));
    }

    #[test]
    fn test_same_day_range_is_valid() {
        let range = DateRange::new(date(2024, 6, 15), date(2024, 6, 15)).unwrap();
        assert!(range.contains(date(2024, 6, 15)));
    }

    #[test]
    fn test_invalid_range_returns_error() {
        let result = DateRange::new(date(2024, 1, 31), date(2024, 1, 1));
        assert_eq!(result, Err(DateRangeError::InvalidRange));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(date(2024, 1, 15), date(2024, 3, 10)).unwrap();

        assert!(range.contains(date(2024, 1, 15)));
        assert!(range.contains(date(2024, 3, 10)));
        assert!(!range.contains(date(2024, 1, 14)));
        assert!(!range.contains(date(2024, 3, 11)));
    }

    #[test]
    fn test_month_february_leap_year() {
        let range = DateRange::month(2024, 2).unwrap();

        assert_eq!(range.start, date(2024, 2, 1));
        assert_eq!(range.end, date(2024, 2, 29));
    }

    #[test]
    fn test_month_december() {
        let range = DateRange::month(2023, 12).unwrap();

        assert_eq!(range.start, date(2023, 12, 1));
        assert_eq!(range.end, date(2023, 12, 31));
    }

    #[test]
    fn test_month_out_of_range() {
        assert_eq!(
            DateRange::month(2024, 13),
            Err(DateRangeError::InvalidMonth {
                year: 2024,
                month: 13
            })
        );
    }

    #[test]
    fn test_year_to_date() {
        let range = DateRange::year_to_date(date(2024, 5, 1));

        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 5, 1));
    }
}
