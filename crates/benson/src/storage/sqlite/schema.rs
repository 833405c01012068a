//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Dates are stored as `YYYY-MM-DD` text and IDs as
//! hyphenated UUID text. Append-only tables rely on `rowid` for insertion
//! order.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Item catalog; one row per distinct trimmed item name
CREATE TABLE IF NOT EXISTS catalog_items (
    id TEXT PRIMARY KEY,
    item_name TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL,
    preferred_vendor TEXT,
    last_unit_cost REAL NOT NULL,
    average_unit_cost REAL NOT NULL,
    min_unit_cost REAL NOT NULL,
    max_unit_cost REAL NOT NULL,
    last_purchased_date TEXT,
    purchase_count INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS price_history (
    id TEXT PRIMARY KEY,
    item_id TEXT NOT NULL,
    vendor_name TEXT,
    unit_cost REAL NOT NULL,
    purchase_date TEXT,
    receipt_id TEXT NOT NULL,
    FOREIGN KEY (item_id) REFERENCES catalog_items(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS jobs (
    id TEXT PRIMARY KEY,
    job_name TEXT NOT NULL,
    po_number TEXT,
    customer_name TEXT,
    status TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS estimates (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL,
    total_amount REAL NOT NULL,
    status TEXT NOT NULL
);

-- source_type is 'manual' or 'receipt'; receipt_id is set for the latter
CREATE TABLE IF NOT EXISTS job_costs (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL,
    category TEXT NOT NULL,
    description TEXT NOT NULL,
    amount REAL NOT NULL,
    cost_date TEXT NOT NULL,
    source_type TEXT NOT NULL,
    receipt_id TEXT
);

CREATE TABLE IF NOT EXISTS job_labor (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL,
    staff_name TEXT NOT NULL,
    hours REAL NOT NULL,
    total_labor_cost REAL NOT NULL,
    work_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS job_revenue (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL,
    invoice_id TEXT,
    amount REAL NOT NULL,
    revenue_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS receipts (
    id TEXT PRIMARY KEY,
    vendor_name TEXT,
    receipt_date TEXT,
    total_amount REAL NOT NULL,
    job_id TEXT,
    confidence_score REAL,
    status TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS receipt_line_items (
    id TEXT PRIMARY KEY,
    receipt_id TEXT NOT NULL,
    item_name TEXT NOT NULL,
    quantity REAL NOT NULL,
    unit_cost REAL NOT NULL,
    total_cost REAL NOT NULL,
    FOREIGN KEY (receipt_id) REFERENCES receipts(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS invoices (
    id TEXT PRIMARY KEY,
    job_id TEXT,
    customer_name TEXT,
    invoice_number TEXT NOT NULL UNIQUE,
    invoice_date TEXT NOT NULL,
    due_date TEXT NOT NULL,
    total_amount REAL NOT NULL,
    status TEXT NOT NULL,
    payment_status TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS invoice_payments (
    id TEXT PRIMARY KEY,
    invoice_id TEXT NOT NULL,
    payment_date TEXT NOT NULL,
    amount_paid REAL NOT NULL,
    payment_method TEXT NOT NULL,
    notes TEXT,
    FOREIGN KEY (invoice_id) REFERENCES invoices(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_price_history_item_id ON price_history(item_id);
CREATE INDEX IF NOT EXISTS idx_estimates_job_id ON estimates(job_id);
CREATE INDEX IF NOT EXISTS idx_job_costs_job_id ON job_costs(job_id);
CREATE INDEX IF NOT EXISTS idx_job_costs_cost_date ON job_costs(cost_date);
CREATE INDEX IF NOT EXISTS idx_job_labor_job_id ON job_labor(job_id);
CREATE INDEX IF NOT EXISTS idx_job_labor_work_date ON job_labor(work_date);
CREATE INDEX IF NOT EXISTS idx_job_revenue_job_id ON job_revenue(job_id);
CREATE INDEX IF NOT EXISTS idx_receipts_receipt_date ON receipts(receipt_date);
CREATE INDEX IF NOT EXISTS idx_line_items_receipt_id ON receipt_line_items(receipt_id);
CREATE INDEX IF NOT EXISTS idx_invoices_invoice_date ON invoices(invoice_date);
CREATE INDEX IF NOT EXISTS idx_payments_invoice_id ON invoice_payments(invoice_id);
"#;

// Catalog queries
const ITEM_COLUMNS: &str = "id, item_name, category, preferred_vendor, last_unit_cost, \
     average_unit_cost, min_unit_cost, max_unit_cost, last_purchased_date, purchase_count";

pub const INSERT_ITEM: &str = r#"
INSERT INTO catalog_items (id, item_name, category, preferred_vendor, last_unit_cost,
    average_unit_cost, min_unit_cost, max_unit_cost, last_purchased_date, purchase_count)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
"#;

pub const UPDATE_ITEM: &str = r#"
UPDATE catalog_items
SET item_name = ?2, category = ?3, preferred_vendor = ?4, last_unit_cost = ?5,
    average_unit_cost = ?6, min_unit_cost = ?7, max_unit_cost = ?8,
    last_purchased_date = ?9, purchase_count = ?10
WHERE id = ?1
"#;

pub fn select_item_by_id() -> String {
    format!("SELECT {ITEM_COLUMNS} FROM catalog_items WHERE id = ?1")
}

pub fn select_item_by_name() -> String {
    format!("SELECT {ITEM_COLUMNS} FROM catalog_items WHERE item_name = ?1")
}

pub fn select_items() -> String {
    format!("SELECT {ITEM_COLUMNS} FROM catalog_items ORDER BY item_name ASC")
}

pub fn search_items() -> String {
    format!(
        "SELECT {ITEM_COLUMNS} FROM catalog_items \
         WHERE instr(lower(item_name), lower(?1)) > 0 \
         ORDER BY purchase_count DESC, item_name ASC \
         LIMIT ?2"
    )
}

pub const INSERT_PRICE_HISTORY: &str = r#"
INSERT INTO price_history (id, item_id, vendor_name, unit_cost, purchase_date, receipt_id)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

/// Newest purchase first; undated entries last.
pub const SELECT_PRICE_HISTORY: &str = r#"
SELECT id, item_id, vendor_name, unit_cost, purchase_date, receipt_id
FROM price_history
WHERE item_id = ?1
ORDER BY purchase_date IS NULL, purchase_date DESC, rowid DESC
"#;

// Job queries
pub const INSERT_JOB: &str = r#"
INSERT INTO jobs (id, job_name, po_number, customer_name, status)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const UPDATE_JOB: &str = r#"
UPDATE jobs
SET job_name = ?2, po_number = ?3, customer_name = ?4, status = ?5
WHERE id = ?1
"#;

pub const SELECT_JOB_BY_ID: &str = r#"
SELECT id, job_name, po_number, customer_name, status
FROM jobs
WHERE id = ?1
"#;

pub const SELECT_JOBS: &str = r#"
SELECT id, job_name, po_number, customer_name, status
FROM jobs
ORDER BY job_name ASC
"#;

pub const SELECT_ACTIVE_JOBS: &str = r#"
SELECT id, job_name, po_number, customer_name, status
FROM jobs
WHERE status = 'active'
ORDER BY job_name ASC
"#;

pub const SEARCH_ACTIVE_JOBS: &str = r#"
SELECT id, job_name, po_number, customer_name, status
FROM jobs
WHERE status = 'active'
  AND (instr(lower(job_name), lower(?1)) > 0
       OR instr(lower(coalesce(po_number, '')), lower(?1)) > 0)
ORDER BY job_name ASC
LIMIT ?2
"#;

// Costing queries
pub const INSERT_ESTIMATE: &str = r#"
INSERT INTO estimates (id, job_id, total_amount, status)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const SELECT_ESTIMATES_BY_JOB: &str = r#"
SELECT id, job_id, total_amount, status
FROM estimates
WHERE job_id = ?1
ORDER BY rowid ASC
"#;

pub const INSERT_JOB_COST: &str = r#"
INSERT INTO job_costs (id, job_id, category, description, amount, cost_date, source_type, receipt_id)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_JOB_COSTS_BY_JOB: &str = r#"
SELECT id, job_id, category, description, amount, cost_date, source_type, receipt_id
FROM job_costs
WHERE job_id = ?1
ORDER BY rowid ASC
"#;

pub const SELECT_JOB_COSTS_IN_RANGE: &str = r#"
SELECT id, job_id, category, description, amount, cost_date, source_type, receipt_id
FROM job_costs
WHERE cost_date >= ?1 AND cost_date <= ?2
ORDER BY rowid ASC
"#;

pub const INSERT_JOB_LABOR: &str = r#"
INSERT INTO job_labor (id, job_id, staff_name, hours, total_labor_cost, work_date)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_JOB_LABOR_BY_JOB: &str = r#"
SELECT id, job_id, staff_name, hours, total_labor_cost, work_date
FROM job_labor
WHERE job_id = ?1
ORDER BY rowid ASC
"#;

pub const SELECT_JOB_LABOR_IN_RANGE: &str = r#"
SELECT id, job_id, staff_name, hours, total_labor_cost, work_date
FROM job_labor
WHERE work_date >= ?1 AND work_date <= ?2
ORDER BY rowid ASC
"#;

pub const INSERT_JOB_REVENUE: &str = r#"
INSERT INTO job_revenue (id, job_id, invoice_id, amount, revenue_date)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_JOB_REVENUE_BY_JOB: &str = r#"
SELECT id, job_id, invoice_id, amount, revenue_date
FROM job_revenue
WHERE job_id = ?1
ORDER BY rowid ASC
"#;

// Receipt queries
pub const INSERT_RECEIPT: &str = r#"
INSERT INTO receipts (id, vendor_name, receipt_date, total_amount, job_id, confidence_score, status)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_RECEIPT_BY_ID: &str = r#"
SELECT id, vendor_name, receipt_date, total_amount, job_id, confidence_score, status
FROM receipts
WHERE id = ?1
"#;

pub const SELECT_RECEIPTS_IN_RANGE: &str = r#"
SELECT id, vendor_name, receipt_date, total_amount, job_id, confidence_score, status
FROM receipts
WHERE receipt_date IS NOT NULL AND receipt_date >= ?1 AND receipt_date <= ?2
ORDER BY rowid ASC
"#;

pub const INSERT_LINE_ITEM: &str = r#"
INSERT INTO receipt_line_items (id, receipt_id, item_name, quantity, unit_cost, total_cost)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_LINE_ITEMS_BY_RECEIPT: &str = r#"
SELECT id, receipt_id, item_name, quantity, unit_cost, total_cost
FROM receipt_line_items
WHERE receipt_id = ?1
ORDER BY rowid ASC
"#;

// Invoice queries
pub const INSERT_INVOICE: &str = r#"
INSERT INTO invoices (id, job_id, customer_name, invoice_number, invoice_date, due_date,
    total_amount, status, payment_status)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#;

pub const UPDATE_INVOICE: &str = r#"
UPDATE invoices
SET job_id = ?2, customer_name = ?3, invoice_number = ?4, invoice_date = ?5, due_date = ?6,
    total_amount = ?7, status = ?8, payment_status = ?9
WHERE id = ?1
"#;

pub const SELECT_INVOICE_BY_ID: &str = r#"
SELECT id, job_id, customer_name, invoice_number, invoice_date, due_date,
    total_amount, status, payment_status
FROM invoices
WHERE id = ?1
"#;

/// Most recently recorded first. `?1` may be NULL to disable the search.
pub const SELECT_INVOICES: &str = r#"
SELECT id, job_id, customer_name, invoice_number, invoice_date, due_date,
    total_amount, status, payment_status
FROM invoices
WHERE ?1 IS NULL OR instr(lower(invoice_number), lower(?1)) > 0
ORDER BY rowid DESC
LIMIT ?2
"#;

pub const SELECT_INVOICES_IN_RANGE: &str = r#"
SELECT id, job_id, customer_name, invoice_number, invoice_date, due_date,
    total_amount, status, payment_status
FROM invoices
WHERE invoice_date >= ?1 AND invoice_date <= ?2
ORDER BY rowid ASC
"#;

/// Candidate numbers for a `PREFIX-YEAR-` sequence; the caller picks the
/// highest numeric suffix.
pub const SELECT_INVOICE_NUMBERS_WITH_PREFIX: &str = r#"
SELECT invoice_number
FROM invoices
WHERE substr(invoice_number, 1, length(?1)) = ?1
"#;

pub const INSERT_PAYMENT: &str = r#"
INSERT INTO invoice_payments (id, invoice_id, payment_date, amount_paid, payment_method, notes)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_PAYMENTS_BY_INVOICE: &str = r#"
SELECT id, invoice_id, payment_date, amount_paid, payment_method, notes
FROM invoice_payments
WHERE invoice_id = ?1
ORDER BY rowid ASC
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_valid_sql() {
        for table in [
            "catalog_items",
            "price_history",
            "jobs",
            "estimates",
            "job_costs",
            "job_labor",
            "job_revenue",
            "receipts",
            "receipt_line_items",
            "invoices",
            "invoice_payments",
        ] {
            assert!(
                CREATE_TABLES.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")),
                "missing table {table}"
            );
        }
    }

    #[test]
    fn test_item_name_is_unique() {
        assert!(CREATE_TABLES.contains("item_name TEXT NOT NULL UNIQUE"));
        assert!(CREATE_TABLES.contains("invoice_number TEXT NOT NULL UNIQUE"));
    }

    #[test]
    fn test_item_queries_share_columns() {
        assert!(select_item_by_name().contains("WHERE item_name = ?1"));
        assert!(search_items().contains("LIMIT ?2"));
        assert!(select_items().starts_with("SELECT id, item_name, category"));
    }

    #[test]
    fn test_range_queries_are_inclusive() {
        assert!(SELECT_JOB_COSTS_IN_RANGE.contains("cost_date >= ?1 AND cost_date <= ?2"));
        assert!(SELECT_JOB_LABOR_IN_RANGE.contains("work_date >= ?1 AND work_date <= ?2"));
        assert!(SELECT_INVOICES_IN_RANGE.contains("invoice_date >= ?1 AND invoice_date <= ?2"));
    }
}
