//! Company-level aggregations: financial summary and vendor analysis.

mod financial;
mod vendors;

pub use financial::{
    build_financial_summary, months_in_range, CompanyFinancialSummary, MonthKey, MonthlyBucket,
};
pub use vendors::{vendor_spend, VendorSpend, UNKNOWN_VENDOR};
