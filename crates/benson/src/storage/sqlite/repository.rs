//! SQLite repository implementation.
//!
//! Implements the repository traits from `benson_core::storage` using SQLite.

use async_trait::async_trait;
use rusqlite::{OptionalExtension, Params, Row};
use tokio_rusqlite::Connection;
use uuid::Uuid;

use benson_core::costing::{Estimate, Job, JobCostRecord, JobLaborRecord, JobRevenueRecord};
use benson_core::invoicing::{invoice_sequence, Invoice, InvoicePayment};
use benson_core::ledger::{CatalogItem, PriceHistoryEntry};
use benson_core::receipts::{Receipt, ReceiptLineItem};
use benson_core::storage::{
    CatalogRepository, CostingRepository, DateRange, InvoiceRepository, JobRepository,
    ReceiptRepository, ReportingRepository, RepositoryError, Result,
};

use super::conversions::{
    cost_source_columns, format_date, format_optional_date, row_to_estimate, row_to_invoice,
    row_to_item, row_to_job, row_to_job_cost, row_to_labor, row_to_line_item, row_to_payment,
    row_to_price_history, row_to_receipt, row_to_revenue,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn query_all<T, P, F>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: P,
    map: F,
) -> std::result::Result<Vec<T>, tokio_rusqlite::Error>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
    let rows = stmt.query_map(params, map).map_err(wrap_err)?;
    rows.collect::<rusqlite::Result<Vec<T>>>().map_err(wrap_err)
}

fn query_one<T, P, F>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: P,
    map: F,
) -> std::result::Result<Option<T>, tokio_rusqlite::Error>
where
    P: Params,
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
    stmt.query_row(params, map).optional().map_err(wrap_err)
}

/// Runs an UPDATE, turning "no row matched" into `QueryReturnedNoRows`.
fn execute_update<P: Params>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: P,
) -> std::result::Result<(), tokio_rusqlite::Error> {
    let rows = conn.execute(sql, params).map_err(wrap_err)?;
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

fn range_params(range: DateRange) -> (String, String) {
    (format_date(&range.start), format_date(&range.end))
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;
        tracing::debug!(path, "Opened SQLite database");

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// CatalogRepository implementation
// ============================================================================

#[async_trait]
impl CatalogRepository for SqliteRepository {
    async fn get_item(&self, id: Uuid) -> Result<Option<CatalogItem>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| query_one(conn, &schema::select_item_by_id(), [&id_str], row_to_item))
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CatalogItem", id.to_string()))
    }

    async fn find_item_by_name(&self, item_name: &str) -> Result<Option<CatalogItem>> {
        let name = item_name.to_string();

        self.conn
            .call(move |conn| query_one(conn, &schema::select_item_by_name(), [&name], row_to_item))
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CatalogItem", item_name))
    }

    async fn list_items(&self) -> Result<Vec<CatalogItem>> {
        self.conn
            .call(|conn| query_all(conn, &schema::select_items(), [], row_to_item))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "CatalogItem"))
    }

    async fn search_items(&self, keyword: &str, limit: usize) -> Result<Vec<CatalogItem>> {
        let keyword = keyword.to_string();
        let limit = limit as i64;

        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    &schema::search_items(),
                    rusqlite::params![keyword, limit],
                    row_to_item,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "CatalogItem"))
    }

    async fn create_item(&self, item: &CatalogItem) -> Result<()> {
        let row = item.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_ITEM,
                    rusqlite::params![
                        row.id.to_string(),
                        row.item_name,
                        row.category,
                        row.preferred_vendor,
                        row.last_unit_cost,
                        row.average_unit_cost,
                        row.min_unit_cost,
                        row.max_unit_cost,
                        format_optional_date(row.last_purchased_date),
                        row.purchase_count
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CatalogItem", item.item_name.clone()))
    }

    async fn update_item(&self, item: &CatalogItem) -> Result<()> {
        let row = item.clone();

        self.conn
            .call(move |conn| {
                execute_update(
                    conn,
                    schema::UPDATE_ITEM,
                    rusqlite::params![
                        row.id.to_string(),
                        row.item_name,
                        row.category,
                        row.preferred_vendor,
                        row.last_unit_cost,
                        row.average_unit_cost,
                        row.min_unit_cost,
                        row.max_unit_cost,
                        format_optional_date(row.last_purchased_date),
                        row.purchase_count
                    ],
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CatalogItem", item.id.to_string()))
    }

    async fn append_price_history(&self, entry: &PriceHistoryEntry) -> Result<()> {
        let row = entry.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_PRICE_HISTORY,
                    rusqlite::params![
                        row.id.to_string(),
                        row.item_id.to_string(),
                        row.vendor_name,
                        row.unit_cost,
                        format_optional_date(row.purchase_date),
                        row.receipt_id.to_string()
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "PriceHistoryEntry", entry.id.to_string()))
    }

    async fn get_price_history(&self, item_id: Uuid) -> Result<Vec<PriceHistoryEntry>> {
        let item_id = item_id.to_string();

        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_PRICE_HISTORY, [&item_id], row_to_price_history)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "PriceHistoryEntry"))
    }
}

// ============================================================================
// JobRepository implementation
// ============================================================================

#[async_trait]
impl JobRepository for SqliteRepository {
    async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| query_one(conn, schema::SELECT_JOB_BY_ID, [&id_str], row_to_job))
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Job", id.to_string()))
    }

    async fn list_jobs(&self) -> Result<Vec<Job>> {
        self.conn
            .call(|conn| query_all(conn, schema::SELECT_JOBS, [], row_to_job))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Job"))
    }

    async fn list_active_jobs(&self) -> Result<Vec<Job>> {
        self.conn
            .call(|conn| query_all(conn, schema::SELECT_ACTIVE_JOBS, [], row_to_job))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Job"))
    }

    async fn search_active_jobs(&self, term: &str, limit: usize) -> Result<Vec<Job>> {
        let term = term.to_string();
        let limit = limit as i64;

        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SEARCH_ACTIVE_JOBS,
                    rusqlite::params![term, limit],
                    row_to_job,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Job"))
    }

    async fn create_job(&self, job: &Job) -> Result<()> {
        let row = job.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_JOB,
                    rusqlite::params![
                        row.id.to_string(),
                        row.job_name,
                        row.po_number,
                        row.customer_name,
                        row.status.as_str()
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Job", job.id.to_string()))
    }

    async fn update_job(&self, job: &Job) -> Result<()> {
        let row = job.clone();

        self.conn
            .call(move |conn| {
                execute_update(
                    conn,
                    schema::UPDATE_JOB,
                    rusqlite::params![
                        row.id.to_string(),
                        row.job_name,
                        row.po_number,
                        row.customer_name,
                        row.status.as_str()
                    ],
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Job", job.id.to_string()))
    }
}

// ============================================================================
// CostingRepository implementation
// ============================================================================

#[async_trait]
impl CostingRepository for SqliteRepository {
    async fn get_estimates(&self, job_id: Uuid) -> Result<Vec<Estimate>> {
        let job_id = job_id.to_string();

        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_ESTIMATES_BY_JOB, [&job_id], row_to_estimate)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Estimate"))
    }

    async fn get_job_costs(&self, job_id: Uuid) -> Result<Vec<JobCostRecord>> {
        let job_id = job_id.to_string();

        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_JOB_COSTS_BY_JOB, [&job_id], row_to_job_cost)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "JobCostRecord"))
    }

    async fn get_job_labor(&self, job_id: Uuid) -> Result<Vec<JobLaborRecord>> {
        let job_id = job_id.to_string();

        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_JOB_LABOR_BY_JOB, [&job_id], row_to_labor)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "JobLaborRecord"))
    }

    async fn get_job_revenue(&self, job_id: Uuid) -> Result<Vec<JobRevenueRecord>> {
        let job_id = job_id.to_string();

        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_JOB_REVENUE_BY_JOB, [&job_id], row_to_revenue)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "JobRevenueRecord"))
    }

    async fn create_estimate(&self, estimate: &Estimate) -> Result<()> {
        let row = estimate.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_ESTIMATE,
                    rusqlite::params![
                        row.id.to_string(),
                        row.job_id.to_string(),
                        row.total_amount,
                        row.status.as_str()
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Estimate", estimate.id.to_string()))
    }

    async fn create_job_cost(&self, cost: &JobCostRecord) -> Result<()> {
        let row = cost.clone();

        self.conn
            .call(move |conn| {
                let (source_type, receipt_id) = cost_source_columns(&row.source);
                conn.execute(
                    schema::INSERT_JOB_COST,
                    rusqlite::params![
                        row.id.to_string(),
                        row.job_id.to_string(),
                        row.category,
                        row.description,
                        row.amount,
                        format_date(&row.cost_date),
                        source_type,
                        receipt_id
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "JobCostRecord", cost.id.to_string()))
    }

    async fn create_job_labor(&self, labor: &JobLaborRecord) -> Result<()> {
        let row = labor.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_JOB_LABOR,
                    rusqlite::params![
                        row.id.to_string(),
                        row.job_id.to_string(),
                        row.staff_name,
                        row.hours,
                        row.total_labor_cost,
                        format_date(&row.work_date)
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "JobLaborRecord", labor.id.to_string()))
    }

    async fn create_job_revenue(&self, revenue: &JobRevenueRecord) -> Result<()> {
        let row = revenue.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_JOB_REVENUE,
                    rusqlite::params![
                        row.id.to_string(),
                        row.job_id.to_string(),
                        row.invoice_id.map(|id| id.to_string()),
                        row.amount,
                        format_date(&row.revenue_date)
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| {
                map_tokio_rusqlite_error_with_id(e, "JobRevenueRecord", revenue.id.to_string())
            })
    }
}

// ============================================================================
// ReportingRepository implementation
// ============================================================================

#[async_trait]
impl ReportingRepository for SqliteRepository {
    async fn get_invoices_in_range(&self, range: DateRange) -> Result<Vec<Invoice>> {
        let (start, end) = range_params(range);

        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_INVOICES_IN_RANGE, [&start, &end], row_to_invoice)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Invoice"))
    }

    async fn get_job_costs_in_range(&self, range: DateRange) -> Result<Vec<JobCostRecord>> {
        let (start, end) = range_params(range);

        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_JOB_COSTS_IN_RANGE, [&start, &end], row_to_job_cost)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "JobCostRecord"))
    }

    async fn get_job_labor_in_range(&self, range: DateRange) -> Result<Vec<JobLaborRecord>> {
        let (start, end) = range_params(range);

        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_JOB_LABOR_IN_RANGE, [&start, &end], row_to_labor)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "JobLaborRecord"))
    }

    async fn get_receipts_in_range(&self, range: DateRange) -> Result<Vec<Receipt>> {
        let (start, end) = range_params(range);

        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_RECEIPTS_IN_RANGE, [&start, &end], row_to_receipt)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Receipt"))
    }
}

// ============================================================================
// ReceiptRepository implementation
// ============================================================================

#[async_trait]
impl ReceiptRepository for SqliteRepository {
    async fn get_receipt(&self, id: Uuid) -> Result<Option<Receipt>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                query_one(conn, schema::SELECT_RECEIPT_BY_ID, [&id_str], row_to_receipt)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Receipt", id.to_string()))
    }

    async fn create_receipt(&self, receipt: &Receipt) -> Result<()> {
        let row = receipt.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_RECEIPT,
                    rusqlite::params![
                        row.id.to_string(),
                        row.vendor_name,
                        format_optional_date(row.receipt_date),
                        row.total_amount,
                        row.job_id.map(|id| id.to_string()),
                        row.confidence_score,
                        row.status.as_str()
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Receipt", receipt.id.to_string()))
    }

    /// Inserts every line in one transaction; either all lines land or none.
    async fn create_line_items(&self, items: &[ReceiptLineItem]) -> Result<()> {
        let rows = items.to_vec();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                {
                    let mut stmt = tx.prepare(schema::INSERT_LINE_ITEM).map_err(wrap_err)?;
                    for row in &rows {
                        stmt.execute(rusqlite::params![
                            row.id.to_string(),
                            row.receipt_id.to_string(),
                            row.item_name,
                            row.quantity,
                            row.unit_cost,
                            row.total_cost
                        ])
                        .map_err(wrap_err)?;
                    }
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ReceiptLineItem"))
    }

    async fn get_line_items(&self, receipt_id: Uuid) -> Result<Vec<ReceiptLineItem>> {
        let receipt_id = receipt_id.to_string();

        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_LINE_ITEMS_BY_RECEIPT,
                    [&receipt_id],
                    row_to_line_item,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ReceiptLineItem"))
    }
}

// ============================================================================
// InvoiceRepository implementation
// ============================================================================

fn invoice_params(row: &Invoice) -> [Box<dyn rusqlite::ToSql + Send>; 9] {
    [
        Box::new(row.id.to_string()),
        Box::new(row.job_id.map(|id| id.to_string())),
        Box::new(row.customer_name.clone()),
        Box::new(row.invoice_number.clone()),
        Box::new(format_date(&row.invoice_date)),
        Box::new(format_date(&row.due_date)),
        Box::new(row.total_amount),
        Box::new(row.status.as_str()),
        Box::new(row.payment_status.as_str()),
    ]
}

#[async_trait]
impl InvoiceRepository for SqliteRepository {
    async fn get_invoice(&self, id: Uuid) -> Result<Option<Invoice>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                query_one(conn, schema::SELECT_INVOICE_BY_ID, [&id_str], row_to_invoice)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Invoice", id.to_string()))
    }

    async fn list_invoices(&self, search: Option<&str>, limit: usize) -> Result<Vec<Invoice>> {
        let search = search.map(str::to_string);
        let limit = limit as i64;

        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_INVOICES,
                    rusqlite::params![search, limit],
                    row_to_invoice,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Invoice"))
    }

    /// Compares numeric suffixes, so `INV-2024-1000` beats `INV-2024-999`.
    async fn latest_invoice_number(&self, prefix: &str, year: i32) -> Result<Option<String>> {
        let like = format!("{prefix}-{year}-");

        let numbers: Vec<String> = self
            .conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_INVOICE_NUMBERS_WITH_PREFIX, [&like], |row| {
                    row.get(0)
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Invoice"))?;

        Ok(numbers
            .into_iter()
            .filter_map(|number| invoice_sequence(prefix, year, &number).map(|seq| (seq, number)))
            .max_by_key(|(seq, _)| *seq)
            .map(|(_, number)| number))
    }

    async fn create_invoice(&self, invoice: &Invoice) -> Result<()> {
        let values = invoice_params(invoice);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_INVOICE,
                    rusqlite::params_from_iter(values.iter()),
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| {
                map_tokio_rusqlite_error_with_id(e, "Invoice", invoice.invoice_number.clone())
            })
    }

    async fn update_invoice(&self, invoice: &Invoice) -> Result<()> {
        let values = invoice_params(invoice);

        self.conn
            .call(move |conn| {
                execute_update(
                    conn,
                    schema::UPDATE_INVOICE,
                    rusqlite::params_from_iter(values.iter()),
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Invoice", invoice.id.to_string()))
    }

    async fn create_payment(&self, payment: &InvoicePayment) -> Result<()> {
        let row = payment.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_PAYMENT,
                    rusqlite::params![
                        row.id.to_string(),
                        row.invoice_id.to_string(),
                        format_date(&row.payment_date),
                        row.amount_paid,
                        row.payment_method,
                        row.notes
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| {
                map_tokio_rusqlite_error_with_id(e, "InvoicePayment", payment.id.to_string())
            })
    }

    async fn get_payments(&self, invoice_id: Uuid) -> Result<Vec<InvoicePayment>> {
        let invoice_id = invoice_id.to_string();

        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_PAYMENTS_BY_INVOICE, [&invoice_id], row_to_payment)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "InvoicePayment"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benson_core::costing::{CostSource, EstimateStatus, JobStatus};
    use benson_core::invoicing::{InvoiceStatus, PaymentStatus, PaymentTerms};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn repo() -> SqliteRepository {
        SqliteRepository::new_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_item_name_is_unique() {
        let repo = repo().await;
        let item = CatalogItem::first_purchase("2x4 Lumber", Some("Home Depot"), 6.5, None)
            .with_category("materials");
        repo.create_item(&item).await.unwrap();

        let twin = CatalogItem::first_purchase("2x4 Lumber", None, 7.0, None);
        let result = repo.create_item(&twin).await;

        assert_eq!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "CatalogItem",
                id: "2x4 Lumber".to_string(),
            })
        );
        assert_eq!(repo.find_item_by_name("2x4 Lumber").await.unwrap(), Some(item));
    }

    #[tokio::test]
    async fn test_item_update_and_search() {
        let repo = repo().await;
        let mut screws = CatalogItem::first_purchase("Deck Screws", None, 24.95, None);
        let lumber = CatalogItem::first_purchase("2x4 Lumber", None, 6.5, None);
        repo.create_item(&screws).await.unwrap();
        repo.create_item(&lumber).await.unwrap();

        screws.record_purchase(22.0, Some(date(2024, 3, 1)));
        repo.update_item(&screws).await.unwrap();

        let found = repo.search_items("SCREW", 10).await.unwrap();
        assert_eq!(found, vec![screws.clone()]);
        let all = repo.list_items().await.unwrap();
        assert_eq!(all[0].item_name, "2x4 Lumber");
        assert_eq!(all[1].purchase_count, 2);
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let repo = repo().await;
        let ghost = CatalogItem::first_purchase("Ghost", None, 1.0, None);

        let result = repo.update_item(&ghost).await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_price_history_newest_first() {
        let repo = repo().await;
        let item = CatalogItem::first_purchase("Rebar", None, 5.0, None);
        repo.create_item(&item).await.unwrap();
        let receipt_id = Uuid::new_v4();
        for (cost, day) in [(5.0, Some(date(2024, 1, 5))), (9.0, None), (12.0, Some(date(2024, 2, 1)))] {
            let entry = PriceHistoryEntry::new(item.id, Some("Lowe's"), cost, day, receipt_id);
            repo.append_price_history(&entry).await.unwrap();
        }

        let history = repo.get_price_history(item.id).await.unwrap();

        let costs: Vec<f64> = history.iter().map(|e| e.unit_cost).collect();
        assert_eq!(costs, vec![12.0, 5.0, 9.0]);
    }

    #[tokio::test]
    async fn test_jobs_and_search() {
        let repo = repo().await;
        let garage = Job::new("Garage").with_po_number("PO-4521");
        let attic = Job::new("Attic").with_status(JobStatus::Completed);
        repo.create_job(&garage).await.unwrap();
        repo.create_job(&attic).await.unwrap();

        assert_eq!(repo.list_jobs().await.unwrap().len(), 2);
        assert_eq!(repo.list_active_jobs().await.unwrap(), vec![garage.clone()]);
        assert_eq!(repo.search_active_jobs("4521", 5).await.unwrap(), vec![garage.clone()]);
        assert!(repo.search_active_jobs("attic", 5).await.unwrap().is_empty());

        let reopened = attic.clone().with_status(JobStatus::Active);
        repo.update_job(&reopened).await.unwrap();
        assert_eq!(repo.get_job(attic.id).await.unwrap(), Some(reopened));
    }

    #[tokio::test]
    async fn test_costing_facts_round_trip() {
        let repo = repo().await;
        let job_id = Uuid::new_v4();
        let receipt_id = Uuid::new_v4();
        let estimate = Estimate::new(job_id, 10_000.0, EstimateStatus::Accepted);
        let manual = JobCostRecord::new(job_id, "permits", "Permit", 120.0, date(2024, 4, 1));
        let from_receipt =
            JobCostRecord::new(job_id, "materials", "Lumber (Lowe's)", 80.0, date(2024, 4, 2))
                .from_receipt(receipt_id);
        let labor = JobLaborRecord::new(job_id, "Sam", 8.0, 400.0, date(2024, 4, 3));
        let revenue = JobRevenueRecord::new(job_id, 2_000.0, date(2024, 4, 4)).with_invoice(Uuid::new_v4());

        repo.create_estimate(&estimate).await.unwrap();
        repo.create_job_cost(&manual).await.unwrap();
        repo.create_job_cost(&from_receipt).await.unwrap();
        repo.create_job_labor(&labor).await.unwrap();
        repo.create_job_revenue(&revenue).await.unwrap();

        assert_eq!(repo.get_estimates(job_id).await.unwrap(), vec![estimate]);
        let costs = repo.get_job_costs(job_id).await.unwrap();
        assert_eq!(costs, vec![manual, from_receipt]);
        assert_eq!(costs[1].source, CostSource::Receipt { receipt_id });
        assert_eq!(repo.get_job_labor(job_id).await.unwrap(), vec![labor]);
        assert_eq!(repo.get_job_revenue(job_id).await.unwrap(), vec![revenue]);
    }

    #[tokio::test]
    async fn test_range_reads_are_inclusive() {
        let repo = repo().await;
        let job_id = Uuid::new_v4();
        for day in [1, 15, 31] {
            repo.create_job_cost(&JobCostRecord::new(job_id, "materials", "x", 1.0, date(2024, 1, day)))
                .await
                .unwrap();
        }
        repo.create_receipt(&Receipt::new(Some("Lowe's".to_string()), Some(date(2024, 1, 31)), 10.0))
            .await
            .unwrap();
        repo.create_receipt(&Receipt::new(Some("Undated".to_string()), None, 10.0))
            .await
            .unwrap();
        let range = DateRange::new(date(2024, 1, 15), date(2024, 1, 31)).unwrap();

        assert_eq!(repo.get_job_costs_in_range(range).await.unwrap().len(), 2);
        let receipts = repo.get_receipts_in_range(range).await.unwrap();
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].vendor_name.as_deref(), Some("Lowe's"));
    }

    #[tokio::test]
    async fn test_receipt_and_lines() {
        let repo = repo().await;
        let receipt = Receipt::new(Some("Home Depot".to_string()), Some(date(2024, 4, 2)), 87.5)
            .with_job(Uuid::new_v4());
        repo.create_receipt(&receipt).await.unwrap();
        let lines: Vec<ReceiptLineItem> = [("Nails", 2.0, 4.5), ("Glue", 1.0, 7.25)]
            .into_iter()
            .map(|(name, qty, cost)| {
                ReceiptLineItem::from_line(receipt.id, &benson_core::ledger::PurchaseLine::new(name, qty, cost))
            })
            .collect();

        repo.create_line_items(&lines).await.unwrap();

        assert_eq!(repo.get_receipt(receipt.id).await.unwrap(), Some(receipt.clone()));
        assert_eq!(repo.get_line_items(receipt.id).await.unwrap(), lines);
    }

    #[tokio::test]
    async fn test_invoices_listing_and_numbering() {
        let repo = repo().await;
        for number in ["INV-2024-998", "INV-2024-999", "INV-2024-1000", "INV-2023-005"] {
            repo.create_invoice(&Invoice::new(number, date(2024, 1, 10), PaymentTerms::Net30, 100.0))
                .await
                .unwrap();
        }

        let listed = repo.list_invoices(None, 200).await.unwrap();
        assert_eq!(listed[0].invoice_number, "INV-2023-005");
        assert_eq!(repo.list_invoices(Some("inv-2024-99"), 200).await.unwrap().len(), 2);
        assert_eq!(repo.list_invoices(None, 2).await.unwrap().len(), 2);
        assert_eq!(
            repo.latest_invoice_number("INV", 2024).await.unwrap().as_deref(),
            Some("INV-2024-1000")
        );
        assert_eq!(repo.latest_invoice_number("INV", 2025).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_invoice_number_is_rejected() {
        let repo = repo().await;
        let first = Invoice::new("INV-2024-001", date(2024, 1, 10), PaymentTerms::Net30, 100.0);
        let second = Invoice::new("INV-2024-001", date(2024, 1, 11), PaymentTerms::Net30, 200.0);
        repo.create_invoice(&first).await.unwrap();

        let result = repo.create_invoice(&second).await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_payments_and_invoice_update() {
        let repo = repo().await;
        let mut invoice = Invoice::new("INV-2024-001", date(2024, 3, 1), PaymentTerms::Net15, 500.0)
            .with_customer("Lee");
        repo.create_invoice(&invoice).await.unwrap();
        let first = InvoicePayment::new(invoice.id, date(2024, 3, 5), 200.0, "check");
        let second = InvoicePayment::new(invoice.id, date(2024, 3, 9), 300.0, "ach").with_notes("final");
        repo.create_payment(&first).await.unwrap();
        repo.create_payment(&second).await.unwrap();

        invoice.apply_payments(500.0);
        repo.update_invoice(&invoice).await.unwrap();

        let stored = repo.get_invoice(invoice.id).await.unwrap().unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Paid);
        assert_eq!(stored.status, InvoiceStatus::Paid);
        assert_eq!(stored.due_date, date(2024, 3, 16));
        assert_eq!(repo.get_payments(invoice.id).await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_update_missing_invoice_is_not_found() {
        let repo = repo().await;
        let invoice = Invoice::new("INV-2024-001", date(2024, 3, 1), PaymentTerms::Net15, 500.0);

        let result = repo.update_invoice(&invoice).await;

        assert_eq!(
            result,
            Err(RepositoryError::NotFound {
                entity_type: "Invoice",
                id: invoice.id.to_string(),
            })
        );
    }
}
