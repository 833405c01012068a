//! Job costing over the job and costing repositories.

use std::sync::Arc;

use futures_util::future::try_join_all;
use uuid::Uuid;

use benson_core::costing::{
    cost_breakdown, summarize_job, CostBreakdown, CostingPolicy, Estimate, JobCostRecord,
    JobCostingRow, JobCostingSummary, JobFacts, JobLaborRecord, JobRevenueRecord,
};
use benson_core::storage::{CostingRepository, JobRepository, Result};

/// Budget-versus-actual views of jobs.
pub struct JobCosting<R> {
    repository: Arc<R>,
    policy: CostingPolicy,
}

impl<R> JobCosting<R>
where
    R: JobRepository + CostingRepository,
{
    pub fn new(repository: Arc<R>, policy: CostingPolicy) -> Self {
        Self { repository, policy }
    }

    /// Loads every fact the summary needs, concurrently. Any failed fetch
    /// fails the whole load.
    async fn facts(&self, job_id: Uuid) -> Result<JobFacts> {
        let (estimates, costs, labor, revenue) = tokio::try_join!(
            self.repository.get_estimates(job_id),
            self.repository.get_job_costs(job_id),
            self.repository.get_job_labor(job_id),
            self.repository.get_job_revenue(job_id),
        )?;

        Ok(JobFacts {
            estimates,
            costs,
            labor,
            revenue,
        })
    }

    /// Computes the budget-versus-actual summary of one job.
    pub async fn summarize(&self, job_id: Uuid) -> Result<JobCostingSummary> {
        let facts = self.facts(job_id).await?;
        Ok(summarize_job(&facts, &self.policy))
    }

    /// Sums a job's costs per category, labor included.
    pub async fn breakdown(&self, job_id: Uuid) -> Result<CostBreakdown> {
        let (costs, labor) = tokio::try_join!(
            self.repository.get_job_costs(job_id),
            self.repository.get_job_labor(job_id),
        )?;
        Ok(cost_breakdown(&costs, &labor))
    }

    /// Summarizes every active job, in job order.
    pub async fn active_jobs_costing(&self) -> Result<Vec<JobCostingRow>> {
        let jobs = self.repository.list_active_jobs().await?;

        try_join_all(jobs.into_iter().map(move |job| async move {
            let summary = self.summarize(job.id).await?;
            Ok(JobCostingRow {
                job_id: job.id,
                job_name: job.job_name,
                customer_name: job.customer_name,
                summary,
            })
        }))
        .await
    }

    pub async fn record_estimate(&self, estimate: &Estimate) -> Result<()> {
        self.repository.create_estimate(estimate).await
    }

    pub async fn record_job_cost(&self, cost: &JobCostRecord) -> Result<()> {
        self.repository.create_job_cost(cost).await
    }

    pub async fn record_labor(&self, labor: &JobLaborRecord) -> Result<()> {
        self.repository.create_job_labor(labor).await
    }

    pub async fn record_revenue(&self, revenue: &JobRevenueRecord) -> Result<()> {
        self.repository.create_job_revenue(revenue).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benson_core::costing::{BudgetStatus, EstimateStatus, Job, JobStatus};
    use chrono::NaiveDate;

    use crate::storage::InMemoryRepository;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn costing() -> (Arc<InMemoryRepository>, JobCosting<InMemoryRepository>) {
        let repo = Arc::new(InMemoryRepository::new());
        (repo.clone(), JobCosting::new(repo, CostingPolicy::default()))
    }

    #[tokio::test]
    async fn test_summary_from_facts() {
        let (repo, costing) = costing();
        let job_id = Uuid::new_v4();
        repo.create_estimate(&Estimate::new(job_id, 10_000.0, EstimateStatus::Accepted))
            .await
            .unwrap();
        repo.create_estimate(&Estimate::new(job_id, 99_000.0, EstimateStatus::Draft))
            .await
            .unwrap();
        repo.create_job_cost(&JobCostRecord::new(job_id, "materials", "Lumber", 5_000.0, date()))
            .await
            .unwrap();
        repo.create_job_labor(&JobLaborRecord::new(job_id, "Sam", 40.0, 2_350.0, date()))
            .await
            .unwrap();
        repo.create_job_revenue(&JobRevenueRecord::new(job_id, 9_000.0, date()))
            .await
            .unwrap();

        let summary = costing.summarize(job_id).await.unwrap();

        assert_eq!(summary.estimated_revenue, 10_000.0);
        assert_eq!(summary.estimated_cost, 7_000.0);
        assert_eq!(summary.actual_cost, 7_350.0);
        assert_eq!(summary.actual_revenue, 9_000.0);
        assert_eq!(summary.gross_profit, 1_650.0);
        assert_eq!(summary.cost_variance, 350.0);
        assert_eq!(summary.cost_variance_pct, 5.0);
        assert_eq!(summary.status, BudgetStatus::OnBudget);
    }

    #[tokio::test]
    async fn test_job_without_facts_is_all_zero() {
        let (_, costing) = costing();

        let summary = costing.summarize(Uuid::new_v4()).await.unwrap();

        assert_eq!(summary.actual_cost, 0.0);
        assert_eq!(summary.profit_margin, 0.0);
        assert_eq!(summary.cost_variance_pct, 0.0);
        assert_eq!(summary.status, BudgetStatus::OnBudget);
    }

    #[tokio::test]
    async fn test_breakdown_includes_labor() {
        let (repo, costing) = costing();
        let job_id = Uuid::new_v4();
        for (category, amount) in [("MATERIALS", 100.0), ("equipment", 50.0), ("permits", 20.0)] {
            repo.create_job_cost(&JobCostRecord::new(job_id, category, "x", amount, date()))
                .await
                .unwrap();
        }
        repo.create_job_labor(&JobLaborRecord::new(job_id, "Sam", 8.0, 400.0, date()))
            .await
            .unwrap();

        let breakdown = costing.breakdown(job_id).await.unwrap();

        assert_eq!(breakdown.materials, 100.0);
        assert_eq!(breakdown.equipment, 50.0);
        assert_eq!(breakdown.other, 20.0);
        assert_eq!(breakdown.labor, 400.0);
        assert_eq!(breakdown.subcontractor, 0.0);
    }

    #[tokio::test]
    async fn test_active_jobs_costing_skips_closed_jobs() {
        let (repo, costing) = costing();
        let active = Job::new("Bathroom").with_customer("Lee");
        let closed = Job::new("Attic").with_status(JobStatus::Completed);
        repo.create_job(&active).await.unwrap();
        repo.create_job(&closed).await.unwrap();
        repo.create_estimate(&Estimate::new(active.id, 1_000.0, EstimateStatus::Accepted))
            .await
            .unwrap();

        let rows = costing.active_jobs_costing().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].job_id, active.id);
        assert_eq!(rows[0].customer_name.as_deref(), Some("Lee"));
        assert_eq!(rows[0].summary.status, BudgetStatus::UnderBudget);
    }
}
