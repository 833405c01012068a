use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::JobFacts;

/// Budget-versus-actual classification of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    #[serde(rename = "On Budget")]
    OnBudget,
    #[serde(rename = "Over Budget")]
    OverBudget,
    #[serde(rename = "Under Budget")]
    UnderBudget,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::OnBudget => "On Budget",
            BudgetStatus::OverBudget => "Over Budget",
            BudgetStatus::UnderBudget => "Under Budget",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heuristics applied when no real cost estimate exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostingPolicy {
    /// Share of accepted estimate revenue assumed to be cost.
    pub estimated_cost_ratio: f64,
    /// Variance percentage beyond which a job is over or under budget.
    pub budget_tolerance_pct: f64,
}

impl Default for CostingPolicy {
    fn default() -> Self {
        Self {
            estimated_cost_ratio: 0.7,
            budget_tolerance_pct: 5.0,
        }
    }
}

/// Derived budget-versus-actual view of one job. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JobCostingSummary {
    pub estimated_revenue: f64,
    pub estimated_cost: f64,
    pub actual_revenue: f64,
    pub actual_cost: f64,
    pub gross_profit: f64,
    pub profit_margin: f64,
    pub cost_variance: f64,
    pub cost_variance_pct: f64,
    pub status: BudgetStatus,
}

/// One line of the active-jobs costing dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCostingRow {
    pub job_id: Uuid,
    pub job_name: String,
    pub customer_name: Option<String>,
    pub summary: JobCostingSummary,
}

/// Classifies a cost variance percentage. Exactly at the tolerance is on
/// budget.
pub fn classify_budget(cost_variance_pct: f64, tolerance_pct: f64) -> BudgetStatus {
    if cost_variance_pct > tolerance_pct {
        BudgetStatus::OverBudget
    } else if cost_variance_pct < -tolerance_pct {
        BudgetStatus::UnderBudget
    } else {
        BudgetStatus::OnBudget
    }
}

/// Computes the costing summary from a job's facts.
///
/// The facts are assumed to already belong to a single job. Empty fact
/// lists contribute zero.
pub fn summarize_job(facts: &JobFacts, policy: &CostingPolicy) -> JobCostingSummary {
    let estimated_revenue: f64 = facts
        .estimates
        .iter()
        .filter(|e| e.is_accepted())
        .map(|e| e.total_amount)
        .sum();
    let estimated_cost = estimated_revenue * policy.estimated_cost_ratio;

    let actual_cost: f64 = facts.costs.iter().map(|c| c.amount).sum::<f64>()
        + facts.labor.iter().map(|l| l.total_labor_cost).sum::<f64>();
    let actual_revenue: f64 = facts.revenue.iter().map(|r| r.amount).sum();

    let gross_profit = actual_revenue - actual_cost;
    let profit_margin = if actual_revenue > 0.0 {
        gross_profit / actual_revenue * 100.0
    } else {
        0.0
    };

    let cost_variance = actual_cost - estimated_cost;
    let cost_variance_pct = if estimated_cost > 0.0 {
        cost_variance / estimated_cost * 100.0
    } else {
        0.0
    };

    JobCostingSummary {
        estimated_revenue,
        estimated_cost,
        actual_revenue,
        actual_cost,
        gross_profit,
        profit_margin,
        cost_variance,
        cost_variance_pct,
        status: classify_budget(cost_variance_pct, policy.budget_tolerance_pct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costing::{
        Estimate, EstimateStatus, JobCostRecord, JobLaborRecord, JobRevenueRecord,
    };
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_status_boundaries() {
        assert_eq!(classify_budget(5.0, 5.0), BudgetStatus::OnBudget);
        assert_eq!(classify_budget(-5.0, 5.0), BudgetStatus::OnBudget);
        assert_eq!(classify_budget(5.01, 5.0), BudgetStatus::OverBudget);
        assert_eq!(classify_budget(-5.01, 5.0), BudgetStatus::UnderBudget);
        assert_eq!(classify_budget(0.0, 5.0), BudgetStatus::OnBudget);
    }

    #[test]
    fn test_empty_facts_are_zero_and_on_budget() {
        let summary = summarize_job(&JobFacts::default(), &CostingPolicy::default());

        assert_eq!(summary.estimated_revenue, 0.0);
        assert_eq!(summary.actual_cost, 0.0);
        assert_eq!(summary.profit_margin, 0.0);
        assert_eq!(summary.cost_variance_pct, 0.0);
        assert_eq!(summary.status, BudgetStatus::OnBudget);
    }

    #[test]
    fn test_only_accepted_estimates_count() {
        let job_id = Uuid::new_v4();
        let facts = JobFacts {
            estimates: vec![
                Estimate::new(job_id, 1000.0, EstimateStatus::Accepted),
                Estimate::new(job_id, 5000.0, EstimateStatus::Draft),
                Estimate::new(job_id, 7000.0, EstimateStatus::Rejected),
            ],
            ..JobFacts::default()
        };

        let summary = summarize_job(&facts, &CostingPolicy::default());

        assert_close(summary.estimated_revenue, 1000.0);
        assert_close(summary.estimated_cost, 700.0);
    }

    #[test]
    fn test_full_summary() {
        let job_id = Uuid::new_v4();
        let facts = JobFacts {
            estimates: vec![Estimate::new(job_id, 1000.0, EstimateStatus::Accepted)],
            costs: vec![JobCostRecord::new(job_id, "materials", "Drywall", 500.0, date())],
            labor: vec![JobLaborRecord::new(job_id, "Ana", 10.0, 300.0, date())],
            revenue: vec![JobRevenueRecord::new(job_id, 1200.0, date())],
        };

        let summary = summarize_job(&facts, &CostingPolicy::default());

        assert_close(summary.actual_cost, 800.0);
        assert_close(summary.actual_revenue, 1200.0);
        assert_close(summary.gross_profit, 400.0);
        assert_close(summary.profit_margin, 400.0 / 1200.0 * 100.0);
        assert_close(summary.cost_variance, 100.0);
        assert_close(summary.cost_variance_pct, 100.0 / 700.0 * 100.0);
        assert_eq!(summary.status, BudgetStatus::OverBudget);
    }

    #[test]
    fn test_under_budget() {
        let job_id = Uuid::new_v4();
        let facts = JobFacts {
            estimates: vec![Estimate::new(job_id, 1000.0, EstimateStatus::Accepted)],
            costs: vec![JobCostRecord::new(job_id, "materials", "Tile", 600.0, date())],
            ..JobFacts::default()
        };

        let summary = summarize_job(&facts, &CostingPolicy::default());

        assert_eq!(summary.status, BudgetStatus::UnderBudget);
    }

    #[test]
    fn test_policy_is_applied() {
        let job_id = Uuid::new_v4();
        let facts = JobFacts {
            estimates: vec![Estimate::new(job_id, 1000.0, EstimateStatus::Accepted)],
            costs: vec![JobCostRecord::new(job_id, "materials", "Tile", 600.0, date())],
            ..JobFacts::default()
        };
        let policy = CostingPolicy {
            estimated_cost_ratio: 0.6,
            budget_tolerance_pct: 1.0,
        };

        let summary = summarize_job(&facts, &policy);

        assert_close(summary.estimated_cost, 600.0);
        assert_eq!(summary.status, BudgetStatus::OnBudget);
    }

    #[test]
    fn test_cost_without_estimate_stays_on_budget() {
        let job_id = Uuid::new_v4();
        let facts = JobFacts {
            costs: vec![JobCostRecord::new(job_id, "materials", "2x4 Lumber", 6.5, date())],
            ..JobFacts::default()
        };

        let summary = summarize_job(&facts, &CostingPolicy::default());

        assert_eq!(summary.estimated_cost, 0.0);
        assert_eq!(summary.actual_cost, 6.5);
        assert_eq!(summary.cost_variance_pct, 0.0);
        assert_eq!(summary.status, BudgetStatus::OnBudget);
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&BudgetStatus::UnderBudget).unwrap();
        assert_eq!(json, r#""Under Budget""#);
        assert_eq!(BudgetStatus::OnBudget.to_string(), "On Budget");
    }
}
