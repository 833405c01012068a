use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{JobCostRecord, JobLaborRecord};

/// Canonical cost buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Materials,
    Labor,
    Equipment,
    Subcontractor,
    Other,
}

impl CostCategory {
    pub const ALL: [CostCategory; 5] = [
        CostCategory::Materials,
        CostCategory::Labor,
        CostCategory::Equipment,
        CostCategory::Subcontractor,
        CostCategory::Other,
    ];

    /// Maps a free-text category label onto a bucket, ignoring case.
    /// Unrecognized labels fold into `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "materials" => CostCategory::Materials,
            "labor" => CostCategory::Labor,
            "equipment" => CostCategory::Equipment,
            "subcontractor" => CostCategory::Subcontractor,
            _ => CostCategory::Other,
        }
    }

    /// Stored label.
    pub fn as_str(&self) -> &'static str {
        match self {
            CostCategory::Materials => "materials",
            CostCategory::Labor => "labor",
            CostCategory::Equipment => "equipment",
            CostCategory::Subcontractor => "subcontractor",
            CostCategory::Other => "other",
        }
    }

    /// Bucket name as shown in breakdowns.
    pub fn display_name(&self) -> &'static str {
        match self {
            CostCategory::Materials => "Materials",
            CostCategory::Labor => "Labor",
            CostCategory::Equipment => "Equipment",
            CostCategory::Subcontractor => "Subcontractor",
            CostCategory::Other => "Other",
        }
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Cost totals per bucket. All five buckets are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    #[serde(rename = "Materials")]
    pub materials: f64,
    #[serde(rename = "Labor")]
    pub labor: f64,
    #[serde(rename = "Equipment")]
    pub equipment: f64,
    #[serde(rename = "Subcontractor")]
    pub subcontractor: f64,
    #[serde(rename = "Other")]
    pub other: f64,
}

impl CostBreakdown {
    pub fn get(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::Materials => self.materials,
            CostCategory::Labor => self.labor,
            CostCategory::Equipment => self.equipment,
            CostCategory::Subcontractor => self.subcontractor,
            CostCategory::Other => self.other,
        }
    }

    fn bucket_mut(&mut self, category: CostCategory) -> &mut f64 {
        match category {
            CostCategory::Materials => &mut self.materials,
            CostCategory::Labor => &mut self.labor,
            CostCategory::Equipment => &mut self.equipment,
            CostCategory::Subcontractor => &mut self.subcontractor,
            CostCategory::Other => &mut self.other,
        }
    }

    pub fn total(&self) -> f64 {
        CostCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// Sums job costs per bucket, then adds the whole labor total to Labor.
pub fn cost_breakdown(costs: &[JobCostRecord], labor: &[JobLaborRecord]) -> CostBreakdown {
    let mut breakdown = CostBreakdown::default();

    for cost in costs {
        *breakdown.bucket_mut(CostCategory::from_label(&cost.category)) += cost.amount;
    }
    breakdown.labor += labor.iter().map(|l| l.total_labor_cost).sum::<f64>();

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn cost(job_id: Uuid, category: &str, amount: f64) -> JobCostRecord {
        JobCostRecord::new(job_id, category, "test", amount, date())
    }

    #[test]
    fn test_from_label_normalizes_case() {
        assert_eq!(CostCategory::from_label("MATERIALS"), CostCategory::Materials);
        assert_eq!(CostCategory::from_label("labor"), CostCategory::Labor);
        assert_eq!(CostCategory::from_label("Subcontractor"), CostCategory::Subcontractor);
    }

    #[test]
    fn test_from_label_unknown_is_other() {
        assert_eq!(CostCategory::from_label("permits"), CostCategory::Other);
        assert_eq!(CostCategory::from_label(""), CostCategory::Other);
    }

    #[test]
    fn test_breakdown_groups_by_category() {
        let job_id = Uuid::new_v4();
        let costs = vec![
            cost(job_id, "materials", 100.0),
            cost(job_id, "Materials", 50.0),
            cost(job_id, "equipment", 300.0),
            cost(job_id, "permit fees", 25.0),
        ];

        let breakdown = cost_breakdown(&costs, &[]);

        assert_eq!(breakdown.materials, 150.0);
        assert_eq!(breakdown.equipment, 300.0);
        assert_eq!(breakdown.other, 25.0);
        assert_eq!(breakdown.labor, 0.0);
        assert_eq!(breakdown.subcontractor, 0.0);
    }

    #[test]
    fn test_breakdown_folds_labor_records_into_labor() {
        let job_id = Uuid::new_v4();
        let costs = vec![cost(job_id, "labor", 200.0)];
        let labor = vec![
            JobLaborRecord::new(job_id, "Ana", 8.0, 320.0, date()),
            JobLaborRecord::new(job_id, "Ben", 4.0, 160.0, date()),
        ];

        let breakdown = cost_breakdown(&costs, &labor);

        assert_eq!(breakdown.labor, 680.0);
        assert_eq!(breakdown.total(), 680.0);
    }

    #[test]
    fn test_empty_breakdown_has_all_buckets() {
        let breakdown = cost_breakdown(&[], &[]);
        let value = serde_json::to_value(breakdown).unwrap();

        for category in CostCategory::ALL {
            assert_eq!(value[category.display_name()], serde_json::json!(0.0));
        }
    }
}
