use crate::costing::CostCategory;

const LABOR_KEYWORDS: &[&str] = &["labor", "installation", "hours"];
const EQUIPMENT_KEYWORDS: &[&str] = &["rental", "equipment", "excavator"];
const SUBCONTRACTOR_KEYWORDS: &[&str] = &["sub", "contractor", "plumber", "electrician"];

/// Guesses the cost category of a purchased item from its name.
///
/// Keyword sets are checked in order (labor, equipment, subcontractor) and
/// the first hit wins. Anything else is a material.
pub fn categorize_item(item_name: &str) -> CostCategory {
    let name = item_name.to_lowercase();
    let hit = |keywords: &[&str]| keywords.iter().any(|k| name.contains(k));

    if hit(LABOR_KEYWORDS) {
        CostCategory::Labor
    } else if hit(EQUIPMENT_KEYWORDS) {
        CostCategory::Equipment
    } else if hit(SUBCONTRACTOR_KEYWORDS) {
        CostCategory::Subcontractor
    } else {
        CostCategory::Materials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labor() {
        assert_eq!(categorize_item("Installation fee"), CostCategory::Labor);
        assert_eq!(categorize_item("8 HOURS framing"), CostCategory::Labor);
    }

    #[test]
    fn test_equipment() {
        assert_eq!(categorize_item("Excavator day rate"), CostCategory::Equipment);
        assert_eq!(categorize_item("Scaffold rental"), CostCategory::Equipment);
    }

    #[test]
    fn test_subcontractor() {
        assert_eq!(categorize_item("Plumber rough-in"), CostCategory::Subcontractor);
        assert_eq!(categorize_item("Electrician"), CostCategory::Subcontractor);
    }

    #[test]
    fn test_precedence() {
        // Matches both labor and subcontractor keywords.
        assert_eq!(categorize_item("Subcontractor labor"), CostCategory::Labor);
        // Matches both equipment and subcontractor keywords.
        assert_eq!(categorize_item("Sub equipment rental"), CostCategory::Equipment);
    }

    #[test]
    fn test_default_is_materials() {
        assert_eq!(categorize_item("2x4 Lumber"), CostCategory::Materials);
        assert_eq!(categorize_item(""), CostCategory::Materials);
    }

    #[test]
    fn test_substring_matches_inside_words() {
        // "sub" is a plain substring check, so "Subfloor" counts.
        assert_eq!(categorize_item("Subfloor panels"), CostCategory::Subcontractor);
    }
}
