use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::costing::{JobCostRecord, JobLaborRecord};
use crate::invoicing::Invoice;
use crate::storage::DateRange;

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Every month touched by `range`, from the start's month through the
/// end's month inclusive.
pub fn months_in_range(range: &DateRange) -> Vec<MonthKey> {
    let last = MonthKey::of(range.end);
    let mut months = Vec::new();
    let mut current = MonthKey::of(range.start);
    while current <= last {
        months.push(current);
        current = current.next();
    }
    months
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// `YYYY-MM`.
    pub month: String,
    pub revenue: f64,
    pub costs: f64,
}

/// Company-wide revenue, cost and profit over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyFinancialSummary {
    pub total_revenue: f64,
    pub total_costs: f64,
    pub gross_profit: f64,
    pub profit_margin: f64,
    /// One bucket per month of the range, ascending, including empty months.
    pub monthly_series: Vec<MonthlyBucket>,
}

/// Aggregates invoices (revenue) and job costs plus labor (costs) dated
/// inside `range`. Records outside the range are ignored.
pub fn build_financial_summary(
    range: &DateRange,
    invoices: &[Invoice],
    costs: &[JobCostRecord],
    labor: &[JobLaborRecord],
) -> CompanyFinancialSummary {
    let mut buckets: BTreeMap<MonthKey, (f64, f64)> = months_in_range(range)
        .into_iter()
        .map(|month| (month, (0.0, 0.0)))
        .collect();

    let revenue = invoices
        .iter()
        .filter(|i| range.contains(i.invoice_date))
        .map(|i| (i.invoice_date, i.total_amount));
    let mut total_revenue = 0.0;
    for (date, amount) in revenue {
        total_revenue += amount;
        buckets.entry(MonthKey::of(date)).or_default().0 += amount;
    }

    let spend = costs
        .iter()
        .filter(|c| range.contains(c.cost_date))
        .map(|c| (c.cost_date, c.amount))
        .chain(
            labor
                .iter()
                .filter(|l| range.contains(l.work_date))
                .map(|l| (l.work_date, l.total_labor_cost)),
        );
    let mut total_costs = 0.0;
    for (date, amount) in spend {
        total_costs += amount;
        buckets.entry(MonthKey::of(date)).or_default().1 += amount;
    }

    let gross_profit = total_revenue - total_costs;
    let profit_margin = if total_revenue > 0.0 {
        gross_profit / total_revenue * 100.0
    } else {
        0.0
    };

    CompanyFinancialSummary {
        total_revenue,
        total_costs,
        gross_profit,
        profit_margin,
        monthly_series: buckets
            .into_iter()
            .map(|(month, (revenue, costs))| MonthlyBucket {
                month: month.to_string(),
                revenue,
                costs,
            })
            .collect(),
    }
}
