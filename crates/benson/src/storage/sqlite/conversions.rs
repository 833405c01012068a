//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use benson_core::costing::{
    CostSource, Estimate, EstimateStatus, Job, JobCostRecord, JobLaborRecord, JobRevenueRecord,
    JobStatus,
};
use benson_core::invoicing::{Invoice, InvoicePayment, InvoiceStatus, PaymentStatus};
use benson_core::ledger::{CatalogItem, PriceHistoryEntry};
use benson_core::receipts::{Receipt, ReceiptLineItem, ReceiptStatus};
use chrono::NaiveDate;
use rusqlite::Row;
use uuid::Uuid;

// ============================================================================
// Catalog conversions
// ============================================================================

/// Expected columns: id, item_name, category, preferred_vendor,
/// last_unit_cost, average_unit_cost, min_unit_cost, max_unit_cost,
/// last_purchased_date, purchase_count
pub fn row_to_item(row: &Row) -> rusqlite::Result<CatalogItem> {
    let id: String = row.get(0)?;
    let last_purchased_date: Option<String> = row.get(8)?;

    Ok(CatalogItem {
        id: parse_uuid(&id)?,
        item_name: row.get(1)?,
        category: row.get(2)?,
        preferred_vendor: row.get(3)?,
        last_unit_cost: row.get(4)?,
        average_unit_cost: row.get(5)?,
        min_unit_cost: row.get(6)?,
        max_unit_cost: row.get(7)?,
        last_purchased_date: parse_optional_date(last_purchased_date.as_deref())?,
        purchase_count: row.get(9)?,
    })
}

/// Expected columns: id, item_id, vendor_name, unit_cost, purchase_date,
/// receipt_id
pub fn row_to_price_history(row: &Row) -> rusqlite::Result<PriceHistoryEntry> {
    let id: String = row.get(0)?;
    let item_id: String = row.get(1)?;
    let purchase_date: Option<String> = row.get(4)?;
    let receipt_id: String = row.get(5)?;

    Ok(PriceHistoryEntry {
        id: parse_uuid(&id)?,
        item_id: parse_uuid(&item_id)?,
        vendor_name: row.get(2)?,
        unit_cost: row.get(3)?,
        purchase_date: parse_optional_date(purchase_date.as_deref())?,
        receipt_id: parse_uuid(&receipt_id)?,
    })
}

// ============================================================================
// Job conversions
// ============================================================================

/// Expected columns: id, job_name, po_number, customer_name, status
pub fn row_to_job(row: &Row) -> rusqlite::Result<Job> {
    let id: String = row.get(0)?;
    let status: String = row.get(4)?;

    Ok(Job {
        id: parse_uuid(&id)?,
        job_name: row.get(1)?,
        po_number: row.get(2)?,
        customer_name: row.get(3)?,
        status: parse_label(&status, JobStatus::parse, "job status")?,
    })
}

/// Expected columns: id, job_id, total_amount, status
pub fn row_to_estimate(row: &Row) -> rusqlite::Result<Estimate> {
    let id: String = row.get(0)?;
    let job_id: String = row.get(1)?;
    let status: String = row.get(3)?;

    Ok(Estimate {
        id: parse_uuid(&id)?,
        job_id: parse_uuid(&job_id)?,
        total_amount: row.get(2)?,
        status: parse_label(&status, EstimateStatus::parse, "estimate status")?,
    })
}

/// Expected columns: id, job_id, category, description, amount, cost_date,
/// source_type, receipt_id
pub fn row_to_job_cost(row: &Row) -> rusqlite::Result<JobCostRecord> {
    let id: String = row.get(0)?;
    let job_id: String = row.get(1)?;
    let cost_date: String = row.get(5)?;
    let source_type: String = row.get(6)?;
    let receipt_id: Option<String> = row.get(7)?;

    Ok(JobCostRecord {
        id: parse_uuid(&id)?,
        job_id: parse_uuid(&job_id)?,
        category: row.get(2)?,
        description: row.get(3)?,
        amount: row.get(4)?,
        cost_date: parse_date(&cost_date)?,
        source: parse_cost_source(&source_type, receipt_id.as_deref())?,
    })
}

/// Splits a cost source into its `source_type` and `receipt_id` columns.
pub fn cost_source_columns(source: &CostSource) -> (&'static str, Option<String>) {
    match source {
        CostSource::Manual => ("manual", None),
        CostSource::Receipt { receipt_id } => ("receipt", Some(receipt_id.to_string())),
    }
}

fn parse_cost_source(source_type: &str, receipt_id: Option<&str>) -> rusqlite::Result<CostSource> {
    match (source_type, receipt_id) {
        ("manual", _) => Ok(CostSource::Manual),
        ("receipt", Some(id)) => Ok(CostSource::Receipt {
            receipt_id: parse_uuid(id)?,
        }),
        _ => Err(invalid_data(format!(
            "Unknown cost source: {source_type} (receipt: {receipt_id:?})"
        ))),
    }
}

/// Expected columns: id, job_id, staff_name, hours, total_labor_cost,
/// work_date
pub fn row_to_labor(row: &Row) -> rusqlite::Result<JobLaborRecord> {
    let id: String = row.get(0)?;
    let job_id: String = row.get(1)?;
    let work_date: String = row.get(5)?;

    Ok(JobLaborRecord {
        id: parse_uuid(&id)?,
        job_id: parse_uuid(&job_id)?,
        staff_name: row.get(2)?,
        hours: row.get(3)?,
        total_labor_cost: row.get(4)?,
        work_date: parse_date(&work_date)?,
    })
}

/// Expected columns: id, job_id, invoice_id, amount, revenue_date
pub fn row_to_revenue(row: &Row) -> rusqlite::Result<JobRevenueRecord> {
    let id: String = row.get(0)?;
    let job_id: String = row.get(1)?;
    let invoice_id: Option<String> = row.get(2)?;
    let revenue_date: String = row.get(4)?;

    Ok(JobRevenueRecord {
        id: parse_uuid(&id)?,
        job_id: parse_uuid(&job_id)?,
        invoice_id: parse_optional_uuid(invoice_id.as_deref())?,
        amount: row.get(3)?,
        revenue_date: parse_date(&revenue_date)?,
    })
}

// ============================================================================
// Receipt conversions
// ============================================================================

/// Expected columns: id, vendor_name, receipt_date, total_amount, job_id,
/// confidence_score, status
pub fn row_to_receipt(row: &Row) -> rusqlite::Result<Receipt> {
    let id: String = row.get(0)?;
    let receipt_date: Option<String> = row.get(2)?;
    let job_id: Option<String> = row.get(4)?;
    let status: String = row.get(6)?;

    Ok(Receipt {
        id: parse_uuid(&id)?,
        vendor_name: row.get(1)?,
        receipt_date: parse_optional_date(receipt_date.as_deref())?,
        total_amount: row.get(3)?,
        job_id: parse_optional_uuid(job_id.as_deref())?,
        confidence_score: row.get(5)?,
        status: parse_label(&status, ReceiptStatus::parse, "receipt status")?,
    })
}

/// Expected columns: id, receipt_id, item_name, quantity, unit_cost,
/// total_cost
pub fn row_to_line_item(row: &Row) -> rusqlite::Result<ReceiptLineItem> {
    let id: String = row.get(0)?;
    let receipt_id: String = row.get(1)?;

    Ok(ReceiptLineItem {
        id: parse_uuid(&id)?,
        receipt_id: parse_uuid(&receipt_id)?,
        item_name: row.get(2)?,
        quantity: row.get(3)?,
        unit_cost: row.get(4)?,
        total_cost: row.get(5)?,
    })
}

// ============================================================================
// Invoice conversions
// ============================================================================

/// Expected columns: id, job_id, customer_name, invoice_number,
/// invoice_date, due_date, total_amount, status, payment_status
pub fn row_to_invoice(row: &Row) -> rusqlite::Result<Invoice> {
    let id: String = row.get(0)?;
    let job_id: Option<String> = row.get(1)?;
    let invoice_date: String = row.get(4)?;
    let due_date: String = row.get(5)?;
    let status: String = row.get(7)?;
    let payment_status: String = row.get(8)?;

    Ok(Invoice {
        id: parse_uuid(&id)?,
        job_id: parse_optional_uuid(job_id.as_deref())?,
        customer_name: row.get(2)?,
        invoice_number: row.get(3)?,
        invoice_date: parse_date(&invoice_date)?,
        due_date: parse_date(&due_date)?,
        total_amount: row.get(6)?,
        status: parse_label(&status, InvoiceStatus::parse, "invoice status")?,
        payment_status: parse_label(&payment_status, PaymentStatus::parse, "payment status")?,
    })
}

/// Expected columns: id, invoice_id, payment_date, amount_paid,
/// payment_method, notes
pub fn row_to_payment(row: &Row) -> rusqlite::Result<InvoicePayment> {
    let id: String = row.get(0)?;
    let invoice_id: String = row.get(1)?;
    let payment_date: String = row.get(2)?;

    Ok(InvoicePayment {
        id: parse_uuid(&id)?,
        invoice_id: parse_uuid(&invoice_id)?,
        payment_date: parse_date(&payment_date)?,
        amount_paid: row.get(3)?,
        payment_method: row.get(4)?,
        notes: row.get(5)?,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

fn invalid_data(message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

/// Parse a stored status label with the domain type's own parser.
fn parse_label<T>(s: &str, parse: fn(&str) -> Option<T>, what: &str) -> rusqlite::Result<T> {
    parse(s).ok_or_else(|| invalid_data(format!("Unknown {what}: {s}")))
}

/// Parse a UUID from string.
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_optional_uuid(s: Option<&str>) -> rusqlite::Result<Option<Uuid>> {
    s.map(parse_uuid).transpose()
}

/// Parse a date from ISO 8601 string (YYYY-MM-DD).
fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_optional_date(s: Option<&str>) -> rusqlite::Result<Option<NaiveDate>> {
    s.map(parse_date).transpose()
}

/// Format a NaiveDate for SQLite storage (YYYY-MM-DD).
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_optional_date(date: Option<NaiveDate>) -> Option<String> {
    date.as_ref().map(format_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_source_columns() {
        let receipt_id = Uuid::new_v4();

        assert_eq!(cost_source_columns(&CostSource::Manual), ("manual", None));
        assert_eq!(
            cost_source_columns(&CostSource::Receipt { receipt_id }),
            ("receipt", Some(receipt_id.to_string()))
        );
    }

    #[test]
    fn test_parse_cost_source() {
        let receipt_id = Uuid::new_v4().to_string();

        assert_eq!(parse_cost_source("manual", None).unwrap(), CostSource::Manual);
        assert!(matches!(
            parse_cost_source("receipt", Some(&receipt_id)).unwrap(),
            CostSource::Receipt { .. }
        ));
        assert!(parse_cost_source("receipt", None).is_err());
        assert!(parse_cost_source("import", None).is_err());
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(
            parse_label("ON_HOLD", JobStatus::parse, "job status").unwrap(),
            JobStatus::OnHold
        );
        assert_eq!(
            parse_label("partially_paid", PaymentStatus::parse, "payment status").unwrap(),
            PaymentStatus::PartiallyPaid
        );
        assert!(parse_label("archived", InvoiceStatus::parse, "invoice status").is_err());
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert_eq!(format_date(&date), "2024-06-05");
        assert_eq!(format_optional_date(None), None);
    }

    #[test]
    fn test_parse_optional_values() {
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(
            parse_optional_date(Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(parse_optional_date(Some("2023-02-29")).is_err());
        assert!(parse_optional_uuid(Some("not-a-uuid")).is_err());
        assert_eq!(parse_optional_uuid(None).unwrap(), None);
    }

    #[test]
    fn test_parse_uuid_valid() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(parse_uuid(uuid_str).unwrap().to_string(), uuid_str);
    }
}
