use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Active,
    Completed,
    OnHold,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Completed => "completed",
            JobStatus::OnHold => "on_hold",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a stored status label, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(JobStatus::Active),
            "completed" => Some(JobStatus::Completed),
            "on_hold" => Some(JobStatus::OnHold),
            "cancelled" => Some(JobStatus::Cancelled),
            _ => None,
        }
    }
}

/// A unit of billable work; the aggregation root for costs, labor, revenue
/// and estimates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub job_name: String,
    pub po_number: Option<String>,
    pub customer_name: Option<String>,
    pub status: JobStatus,
}

impl Job {
    /// Creates a new active job.
    pub fn new(job_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_name: job_name.into(),
            po_number: None,
            customer_name: None,
            status: JobStatus::Active,
        }
    }

    pub fn with_po_number(mut self, po_number: impl Into<String>) -> Self {
        self.po_number = Some(po_number.into());
        self
    }

    pub fn with_customer(mut self, customer_name: impl Into<String>) -> Self {
        self.customer_name = Some(customer_name.into());
        self
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets a specific ID for this job (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == JobStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
}

impl EstimateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimateStatus::Draft => "draft",
            EstimateStatus::Sent => "sent",
            EstimateStatus::Accepted => "accepted",
            EstimateStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(EstimateStatus::Draft),
            "sent" => Some(EstimateStatus::Sent),
            "accepted" => Some(EstimateStatus::Accepted),
            "rejected" => Some(EstimateStatus::Rejected),
            _ => None,
        }
    }
}

/// A proposed pre-work budget for a job. Only accepted estimates count as
/// committed budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub id: Uuid,
    pub job_id: Uuid,
    pub total_amount: f64,
    pub status: EstimateStatus,
}

impl Estimate {
    pub fn new(job_id: Uuid, total_amount: f64, status: EstimateStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id,
            total_amount,
            status,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == EstimateStatus::Accepted
    }
}

/// Where a job cost came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CostSource {
    Receipt { receipt_id: Uuid },
    Manual,
}

/// An append-only cost fact recorded against a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCostRecord {
    pub id: Uuid,
    pub job_id: Uuid,
    /// Free-text label as entered; see [`super::CostCategory::from_label`].
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub cost_date: NaiveDate,
    pub source: CostSource,
}

impl JobCostRecord {
    /// Creates a manually entered cost.
    pub fn new(
        job_id: Uuid,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        cost_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id,
            category: category.into(),
            description: description.into(),
            amount,
            cost_date,
            source: CostSource::Manual,
        }
    }

    /// Marks this cost as derived from a receipt line.
    pub fn from_receipt(mut self, receipt_id: Uuid) -> Self {
        self.source = CostSource::Receipt { receipt_id };
        self
    }
}

/// An append-only labor fact. Always counted under Labor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobLaborRecord {
    pub id: Uuid,
    pub job_id: Uuid,
    pub staff_name: String,
    pub hours: f64,
    pub total_labor_cost: f64,
    pub work_date: NaiveDate,
}

impl JobLaborRecord {
    pub fn new(
        job_id: Uuid,
        staff_name: impl Into<String>,
        hours: f64,
        total_labor_cost: f64,
        work_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id,
            staff_name: staff_name.into(),
            hours,
            total_labor_cost,
            work_date,
        }
    }
}

/// Revenue realized on a job, optionally tied to an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRevenueRecord {
    pub id: Uuid,
    pub job_id: Uuid,
    pub invoice_id: Option<Uuid>,
    pub amount: f64,
    pub revenue_date: NaiveDate,
}

impl JobRevenueRecord {
    pub fn new(job_id: Uuid, amount: f64, revenue_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id,
            invoice_id: None,
            amount,
            revenue_date,
        }
    }

    pub fn with_invoice(mut self, invoice_id: Uuid) -> Self {
        self.invoice_id = Some(invoice_id);
        self
    }
}

/// Every fact the costing summary reads for a single job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFacts {
    pub estimates: Vec<Estimate>,
    pub costs: Vec<JobCostRecord>,
    pub labor: Vec<JobLaborRecord>,
    pub revenue: Vec<JobRevenueRecord>,
}
