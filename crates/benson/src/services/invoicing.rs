//! Invoices: listing, numbering and payments.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use benson_core::invoicing::{
    next_invoice_number, validate_payment_amount, Invoice, InvoicePayment, PaymentTerms,
    INVOICE_LIST_LIMIT,
};
use benson_core::storage::InvoiceRepository;

use crate::error::{Result, ServiceError};

/// What is needed to issue a new invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub job_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub invoice_date: NaiveDate,
    pub terms: PaymentTerms,
    pub total_amount: f64,
}

/// A payment as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentEntry {
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub notes: Option<String>,
}

pub struct InvoiceLedger<R> {
    repository: Arc<R>,
    prefix: String,
}

impl<R: InvoiceRepository> InvoiceLedger<R> {
    pub fn new(repository: Arc<R>, prefix: impl Into<String>) -> Self {
        Self {
            repository,
            prefix: prefix.into(),
        }
    }

    /// Lists invoices newest first, optionally narrowed to numbers containing
    /// `search`.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Invoice>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        Ok(self
            .repository
            .list_invoices(search, INVOICE_LIST_LIMIT)
            .await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Invoice>> {
        Ok(self.repository.get_invoice(id).await?)
    }

    /// Issues a draft invoice numbered after the latest one of its year.
    pub async fn issue(&self, new: NewInvoice) -> Result<Invoice> {
        let year = new.invoice_date.year();
        let latest = self
            .repository
            .latest_invoice_number(&self.prefix, year)
            .await?;
        let number = next_invoice_number(&self.prefix, year, latest.as_deref());

        let mut invoice = Invoice::new(number, new.invoice_date, new.terms, new.total_amount);
        invoice.job_id = new.job_id;
        invoice.customer_name = new.customer_name;

        self.repository.create_invoice(&invoice).await?;
        tracing::info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            "Invoice issued"
        );
        Ok(invoice)
    }

    /// Records a payment and recomputes the invoice's payment status from
    /// every payment on file.
    pub async fn record_payment(&self, invoice_id: Uuid, entry: PaymentEntry) -> Result<Invoice> {
        validate_payment_amount(entry.amount)?;

        let mut invoice = self
            .repository
            .get_invoice(invoice_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                entity_type: "Invoice",
                id: invoice_id.to_string(),
            })?;

        let mut payment = InvoicePayment::new(
            invoice_id,
            entry.payment_date,
            entry.amount,
            entry.payment_method,
        );
        payment.notes = entry.notes;
        self.repository.create_payment(&payment).await?;

        let total_paid: f64 = self
            .repository
            .get_payments(invoice_id)
            .await?
            .iter()
            .map(|p| p.amount_paid)
            .sum();
        invoice.apply_payments(total_paid);
        self.repository.update_invoice(&invoice).await?;

        tracing::info!(
            %invoice_id,
            amount = entry.amount,
            total_paid,
            payment_status = invoice.payment_status.as_str(),
            "Payment recorded"
        );
        Ok(invoice)
    }
}
