use std::sync::Arc;

use benson_core::costing::{
    Estimate, EstimateStatus, Job, JobCostRecord, JobLaborRecord, JobRevenueRecord, JobStatus,
};
use benson_core::invoicing::{Invoice, InvoiceStatus, InvoicePayment, PaymentTerms};
use benson_core::ledger::PurchaseLine;
use benson_core::receipts::ReceiptDraft;
use benson_core::storage::DataStore;
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::error::Result;
use crate::services::ReceiptIntake;

/// Stable IDs so demo commands can reference records across runs.
pub const KITCHEN_JOB_ID: Uuid = Uuid::from_u128(0x0b1e_0000_0000_0000_0000_0000_0000_0001);
pub const DECK_JOB_ID: Uuid = Uuid::from_u128(0x0b1e_0000_0000_0000_0000_0000_0000_0002);
pub const BASEMENT_JOB_ID: Uuid = Uuid::from_u128(0x0b1e_0000_0000_0000_0000_0000_0000_0003);
pub const FENCE_JOB_ID: Uuid = Uuid::from_u128(0x0b1e_0000_0000_0000_0000_0000_0000_0004);

/// Generates the demo jobs. The fence job is already finished.
pub fn generate_mock_jobs() -> Vec<Job> {
    vec![
        Job::new("Kitchen Remodel")
            .with_id(KITCHEN_JOB_ID)
            .with_po_number("PO-1042")
            .with_customer("Alvarez Family"),
        Job::new("Backyard Deck")
            .with_id(DECK_JOB_ID)
            .with_po_number("PO-1077")
            .with_customer("J. Okafor"),
        Job::new("Basement Finish")
            .with_id(BASEMENT_JOB_ID)
            .with_po_number("PO-1103")
            .with_customer("Lindqvist Properties"),
        Job::new("Privacy Fence")
            .with_id(FENCE_JOB_ID)
            .with_customer("J. Okafor")
            .with_status(JobStatus::Completed),
    ]
}

/// Generates estimates; only accepted ones count toward budgets.
pub fn generate_mock_estimates() -> Vec<Estimate> {
    vec![
        Estimate::new(KITCHEN_JOB_ID, 42_000.0, EstimateStatus::Accepted),
        Estimate::new(DECK_JOB_ID, 18_500.0, EstimateStatus::Accepted),
        Estimate::new(DECK_JOB_ID, 3_200.0, EstimateStatus::Sent),
        Estimate::new(BASEMENT_JOB_ID, 27_000.0, EstimateStatus::Accepted),
        Estimate::new(FENCE_JOB_ID, 6_400.0, EstimateStatus::Accepted),
    ]
}

/// Generates manual job costs spread over the last few months.
pub fn generate_mock_costs(today: NaiveDate) -> Vec<JobCostRecord> {
    let days_ago = |n: i64| today - Duration::days(n);

    vec![
        JobCostRecord::new(KITCHEN_JOB_ID, "subcontractor", "Electrician rough-in", 4_800.0, days_ago(62)),
        JobCostRecord::new(KITCHEN_JOB_ID, "materials", "Cabinet order", 11_250.0, days_ago(40)),
        JobCostRecord::new(KITCHEN_JOB_ID, "equipment", "Dumpster rental", 650.0, days_ago(38)),
        JobCostRecord::new(DECK_JOB_ID, "materials", "Composite decking", 7_900.0, days_ago(21)),
        JobCostRecord::new(DECK_JOB_ID, "equipment", "Post hole auger", 240.0, days_ago(20)),
        JobCostRecord::new(BASEMENT_JOB_ID, "materials", "Drywall and mud", 2_150.0, days_ago(9)),
        JobCostRecord::new(BASEMENT_JOB_ID, "permits", "Building permit", 380.0, days_ago(30)),
        JobCostRecord::new(FENCE_JOB_ID, "materials", "Cedar pickets", 2_900.0, days_ago(95)),
    ]
}

/// Generates crew time entries.
pub fn generate_mock_labor(today: NaiveDate) -> Vec<JobLaborRecord> {
    let days_ago = |n: i64| today - Duration::days(n);

    vec![
        JobLaborRecord::new(KITCHEN_JOB_ID, "Marco", 64.0, 3_520.0, days_ago(45)),
        JobLaborRecord::new(KITCHEN_JOB_ID, "Dana", 80.0, 4_000.0, days_ago(33)),
        JobLaborRecord::new(DECK_JOB_ID, "Marco", 56.0, 3_080.0, days_ago(18)),
        JobLaborRecord::new(DECK_JOB_ID, "Eli", 40.0, 1_800.0, days_ago(15)),
        JobLaborRecord::new(BASEMENT_JOB_ID, "Dana", 24.0, 1_200.0, days_ago(7)),
        JobLaborRecord::new(FENCE_JOB_ID, "Eli", 30.0, 1_350.0, days_ago(92)),
    ]
}

/// Generates invoices with a mix of payment states, numbered for
/// `today`'s year.
pub fn generate_mock_invoices(today: NaiveDate) -> Vec<Invoice> {
    let days_ago = |n: i64| today - Duration::days(n);
    let number = |seq: u32| format!("INV-{}-{seq:03}", today.format("%Y"));

    vec![
        Invoice::new(number(1), days_ago(90), PaymentTerms::Net30, 6_400.0)
            .with_job(FENCE_JOB_ID)
            .with_customer("J. Okafor")
            .with_status(InvoiceStatus::Sent),
        Invoice::new(number(2), days_ago(50), PaymentTerms::Net15, 16_800.0)
            .with_job(KITCHEN_JOB_ID)
            .with_customer("Alvarez Family")
            .with_status(InvoiceStatus::Sent),
        Invoice::new(number(3), days_ago(14), PaymentTerms::Net30, 9_250.0)
            .with_job(DECK_JOB_ID)
            .with_customer("J. Okafor")
            .with_status(InvoiceStatus::Sent),
        Invoice::new(number(4), days_ago(2), PaymentTerms::DueOnReceipt, 5_400.0)
            .with_job(BASEMENT_JOB_ID)
            .with_customer("Lindqvist Properties"),
    ]
}

/// Generates receipt drafts as they would come out of extraction and
/// review. One is not attached to any job.
pub fn generate_mock_receipts(today: NaiveDate) -> Vec<ReceiptDraft> {
    let days_ago = |n: i64| today - Duration::days(n);

    vec![
        ReceiptDraft {
            vendor_name: Some("Home Depot".to_string()),
            receipt_date: Some(days_ago(36)),
            total_amount: Some(412.6),
            job_id: Some(KITCHEN_JOB_ID),
            confidence_score: Some(0.94),
            line_items: vec![
                PurchaseLine::new("2x4 Lumber", 24.0, 6.15),
                PurchaseLine::new("Drywall Screws", 4.0, 9.98),
                PurchaseLine::new("Tile Installation Kit", 1.0, 224.0),
            ],
        },
        ReceiptDraft {
            vendor_name: Some("Lowe's".to_string()),
            receipt_date: Some(days_ago(19)),
            total_amount: Some(318.75),
            job_id: Some(DECK_JOB_ID),
            confidence_score: Some(0.88),
            line_items: vec![
                PurchaseLine::new("2x4 Lumber", 30.0, 6.45),
                PurchaseLine::new("Deck Screws", 5.0, 24.95),
            ],
        },
        ReceiptDraft {
            vendor_name: Some("Sunbelt Rentals".to_string()),
            receipt_date: Some(days_ago(10)),
            total_amount: Some(289.0),
            job_id: Some(BASEMENT_JOB_ID),
            confidence_score: Some(0.9),
            line_items: vec![PurchaseLine::new("Mini excavator rental", 1.0, 289.0)],
        },
        ReceiptDraft {
            vendor_name: Some("Home Depot".to_string()),
            receipt_date: Some(days_ago(4)),
            total_amount: Some(57.84),
            job_id: None,
            confidence_score: Some(0.71),
            line_items: vec![
                PurchaseLine::new("Drywall Screws", 2.0, 10.49),
                PurchaseLine::new("Shop Towels", 3.0, 12.29),
            ],
        },
    ]
}

/// Loads the demo data set into `repository`.
///
/// Receipts go through the regular intake so the item catalog and the
/// receipt-derived job costs are built the same way as for real receipts.
pub async fn seed_demo_data<R>(repository: Arc<R>, today: NaiveDate) -> Result<()>
where
    R: DataStore,
{
    for job in generate_mock_jobs() {
        repository.create_job(&job).await?;
    }
    for estimate in generate_mock_estimates() {
        repository.create_estimate(&estimate).await?;
    }
    for cost in generate_mock_costs(today) {
        repository.create_job_cost(&cost).await?;
    }
    for labor in generate_mock_labor(today) {
        repository.create_job_labor(&labor).await?;
    }

    let invoices = generate_mock_invoices(today);
    for invoice in &invoices {
        repository.create_invoice(invoice).await?;
    }
    // The fence invoice is settled and the kitchen one half paid.
    for (invoice, paid) in invoices.iter().zip([6_400.0, 8_400.0]) {
        let payment = InvoicePayment::new(invoice.id, invoice.invoice_date + Duration::days(12), paid, "check");
        repository.create_payment(&payment).await?;
        let mut settled = invoice.clone();
        settled.apply_payments(paid);
        repository.update_invoice(&settled).await?;
        if let Some(job_id) = invoice.job_id {
            let revenue = JobRevenueRecord::new(job_id, paid, payment.payment_date).with_invoice(invoice.id);
            repository.create_job_revenue(&revenue).await?;
        }
    }

    let intake = ReceiptIntake::new(repository);
    for draft in generate_mock_receipts(today) {
        intake.save(draft, today).await?;
    }

    tracing::info!("Seeded demo data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use benson_core::invoicing::PaymentStatus;
    use benson_core::storage::{CatalogRepository, InvoiceRepository, JobRepository};

    use crate::storage::InMemoryRepository;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_job_ids_are_stable() {
        let jobs = generate_mock_jobs();

        assert_eq!(jobs[0].id, KITCHEN_JOB_ID);
        assert_eq!(jobs.iter().filter(|j| j.is_active()).count(), 3);
    }

    #[test]
    fn test_invoice_numbers_follow_year() {
        let invoices = generate_mock_invoices(today());

        assert_eq!(invoices[0].invoice_number, "INV-2024-001");
        assert_eq!(invoices[3].invoice_number, "INV-2024-004");
    }

    #[tokio::test]
    async fn test_seed_builds_catalog_and_payments() {
        let repo = Arc::new(InMemoryRepository::new());

        seed_demo_data(repo.clone(), today()).await.unwrap();

        assert_eq!(repo.list_active_jobs().await.unwrap().len(), 3);
        let lumber = repo.find_item_by_name("2x4 Lumber").await.unwrap().unwrap();
        assert_eq!(lumber.purchase_count, 2);
        assert_eq!(lumber.min_unit_cost, 6.15);
        assert_eq!(lumber.max_unit_cost, 6.45);

        let invoices = repo.list_invoices(None, 10).await.unwrap();
        let statuses: Vec<PaymentStatus> = invoices.iter().rev().map(|i| i.payment_status).collect();
        assert_eq!(
            statuses,
            vec![
                PaymentStatus::Paid,
                PaymentStatus::PartiallyPaid,
                PaymentStatus::Unpaid,
                PaymentStatus::Unpaid,
            ]
        );
        assert_eq!(
            repo.latest_invoice_number("INV", 2024).await.unwrap().as_deref(),
            Some("INV-2024-004")
        );
    }
}
