//! Job costing: budget-versus-actual summaries and category breakdowns.

mod breakdown;
mod summary;
mod types;

pub use breakdown::{cost_breakdown, CostBreakdown, CostCategory};
pub use summary::{
    classify_budget, summarize_job, BudgetStatus, CostingPolicy, JobCostingRow,
    JobCostingSummary,
};
pub use types::{
    CostSource, Estimate, EstimateStatus, Job, JobCostRecord, JobFacts, JobLaborRecord,
    JobRevenueRecord, JobStatus,
};
