use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::operations::{due_date, payment_status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Void,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Void => "void",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(InvoiceStatus::Draft),
            "sent" => Some(InvoiceStatus::Sent),
            "paid" => Some(InvoiceStatus::Paid),
            "overdue" => Some(InvoiceStatus::Overdue),
            "void" => Some(InvoiceStatus::Void),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::PartiallyPaid => "partially_paid",
            PaymentStatus::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unpaid" => Some(PaymentStatus::Unpaid),
            "partially_paid" => Some(PaymentStatus::PartiallyPaid),
            "paid" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

/// Standard payment terms offered on invoices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentTerms {
    #[serde(rename = "Due on Receipt")]
    DueOnReceipt,
    #[serde(rename = "Net 15")]
    Net15,
    #[default]
    #[serde(rename = "Net 30")]
    Net30,
    #[serde(rename = "Net 60")]
    Net60,
}

impl PaymentTerms {
    /// Maps a terms label onto known terms. Unrecognized labels are Net 30.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "due on receipt" => PaymentTerms::DueOnReceipt,
            "net 15" => PaymentTerms::Net15,
            "net 60" => PaymentTerms::Net60,
            _ => PaymentTerms::Net30,
        }
    }

    /// Days between the invoice date and its due date.
    pub fn days(&self) -> u64 {
        match self {
            PaymentTerms::DueOnReceipt => 0,
            PaymentTerms::Net15 => 15,
            PaymentTerms::Net30 => 30,
            PaymentTerms::Net60 => 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub job_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: f64,
    pub status: InvoiceStatus,
    pub payment_status: PaymentStatus,
}

impl Invoice {
    /// Creates a draft, unpaid invoice whose due date follows `terms`.
    pub fn new(
        invoice_number: impl Into<String>,
        invoice_date: NaiveDate,
        terms: PaymentTerms,
        total_amount: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id: None,
            customer_name: None,
            invoice_number: invoice_number.into(),
            invoice_date,
            due_date: due_date(invoice_date, terms),
            total_amount,
            status: InvoiceStatus::Draft,
            payment_status: PaymentStatus::Unpaid,
        }
    }

    pub fn with_job(mut self, job_id: Uuid) -> Self {
        self.job_id = Some(job_id);
        self
    }

    pub fn with_customer(mut self, customer_name: impl Into<String>) -> Self {
        self.customer_name = Some(customer_name.into());
        self
    }

    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets a specific ID for this invoice (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Recomputes the payment status from the sum of all payments. A fully
    /// paid invoice is also marked paid.
    pub fn apply_payments(&mut self, total_paid: f64) {
        self.payment_status = payment_status(self.total_amount, total_paid);
        if self.payment_status == PaymentStatus::Paid {
            self.status = InvoiceStatus::Paid;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoicePayment {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub payment_date: NaiveDate,
    pub amount_paid: f64,
    pub payment_method: String,
    pub notes: Option<String>,
}

impl InvoicePayment {
    pub fn new(
        invoice_id: Uuid,
        payment_date: NaiveDate,
        amount_paid: f64,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            invoice_id,
            payment_date,
            amount_paid,
            payment_method: payment_method.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_invoice_due_date() {
        let invoice = Invoice::new("INV-2024-001", date(2024, 1, 20), PaymentTerms::Net15, 500.0);

        assert_eq!(invoice.due_date, date(2024, 2, 4));
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.payment_status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_partial_payment_keeps_status() {
        let mut invoice = Invoice::new("INV-2024-002", date(2024, 1, 1), PaymentTerms::Net30, 500.0)
            .with_status(InvoiceStatus::Sent);

        invoice.apply_payments(200.0);

        assert_eq!(invoice.payment_status, PaymentStatus::PartiallyPaid);
        assert_eq!(invoice.status, InvoiceStatus::Sent);
    }

    #[test]
    fn test_full_payment_marks_paid() {
        let mut invoice = Invoice::new("INV-2024-003", date(2024, 1, 1), PaymentTerms::Net30, 500.0)
            .with_status(InvoiceStatus::Overdue);

        invoice.apply_payments(500.0);

        assert_eq!(invoice.payment_status, PaymentStatus::Paid);
        assert_eq!(invoice.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_terms_from_label() {
        assert_eq!(PaymentTerms::from_label("Net 15"), PaymentTerms::Net15);
        assert_eq!(PaymentTerms::from_label("net 60"), PaymentTerms::Net60);
        assert_eq!(PaymentTerms::from_label("Due on Receipt"), PaymentTerms::DueOnReceipt);
        assert_eq!(PaymentTerms::from_label("2/10 net 30"), PaymentTerms::Net30);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(InvoiceStatus::parse("VOID"), Some(InvoiceStatus::Void));
        assert_eq!(
            PaymentStatus::parse(PaymentStatus::PartiallyPaid.as_str()),
            Some(PaymentStatus::PartiallyPaid)
        );
        assert_eq!(PaymentStatus::parse("refunded"), None);
    }
}
