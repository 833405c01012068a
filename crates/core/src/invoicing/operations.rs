use chrono::{Days, NaiveDate};

use super::error::InvoiceError;
use super::types::{PaymentStatus, PaymentTerms};

/// Prefix used when none is configured.
pub const DEFAULT_INVOICE_PREFIX: &str = "INV";

/// Maximum number of invoices returned by a listing.
pub const INVOICE_LIST_LIMIT: usize = 200;

/// Computes the due date for an invoice issued on `invoice_date`.
pub fn due_date(invoice_date: NaiveDate, terms: PaymentTerms) -> NaiveDate {
    invoice_date
        .checked_add_days(Days::new(terms.days()))
        .unwrap_or(NaiveDate::MAX)
}

/// Builds the next invoice number in the `PREFIX-YYYY-NNN` sequence.
///
/// `latest` is the highest existing number for the same prefix and year.
/// Anything that does not follow the sequence restarts it at 1.
pub fn next_invoice_number(prefix: &str, year: i32, latest: Option<&str>) -> String {
    let next = latest
        .and_then(|number| invoice_sequence(prefix, year, number))
        .map_or(1, |seq| seq.saturating_add(1));

    format!("{prefix}-{year}-{next:03}")
}

/// Extracts the sequence part of a `PREFIX-YYYY-NNN` invoice number, if the
/// number belongs to that prefix and year.
pub fn invoice_sequence(prefix: &str, year: i32, number: &str) -> Option<u32> {
    number
        .strip_prefix(prefix)?
        .strip_prefix('-')?
        .strip_prefix(year.to_string().as_str())?
        .strip_prefix('-')?
        .parse()
        .ok()
}

/// Derives the payment status from the invoice total and the amount paid.
pub fn payment_status(total_amount: f64, total_paid: f64) -> PaymentStatus {
    if total_amount > 0.0 && total_paid >= total_amount {
        PaymentStatus::Paid
    } else if total_paid > 0.0 {
        PaymentStatus::PartiallyPaid
    } else {
        PaymentStatus::Unpaid
    }
}

/// Rejects payments that are not strictly positive.
pub fn validate_payment_amount(amount: f64) -> Result<(), InvoiceError> {
    if amount > 0.0 && amount.is_finite() {
        Ok(())
    } else {
        Err(InvoiceError::InvalidAmount(amount))
    }
}
