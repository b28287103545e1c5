//! Activity types and the fixed activity catalogue.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The ten tracked activities with their units, in the order reviewers
/// expect in the exported workbook. The ordering is a contract with the
/// downstream DPR template; do not reorder.
pub const FIXED_ACTIVITIES: [(&str, &str); 10] = [
    ("Segment Casting", "Nos"),
    ("Segment Demolding", "Nos"),
    ("Segment Curing", "Nos"),
    ("Segment Transportation", "Nos"),
    ("Quality Inspection", "Nos"),
    ("Reinforcement Work", "Kg"),
    ("Concrete Work", "Cu.m"),
    ("Formwork Installation", "Sq.m"),
    ("Formwork Removal", "Sq.m"),
    ("Steel Fixing", "MT"),
];

/// One activity line in a report submission.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ActivityInput {
    pub activity_name: String,
    pub unit: String,
    #[serde(default)]
    pub target: Decimal,
    #[serde(default)]
    pub achieved: Decimal,
    #[serde(default)]
    pub cumulative: Decimal,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl ActivityInput {
    /// Rows with no quantities at all are dropped rather than stored.
    pub fn has_data(&self) -> bool {
        !self.target.is_zero() || !self.achieved.is_zero() || !self.cumulative.is_zero()
    }

    /// Validate one activity line. Returns every problem found, not just the
    /// first. The quantity columns also carry `CHECK (>= 0)` constraints;
    /// rejecting here keeps those from surfacing as opaque database errors.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let name = &self.activity_name;

        if name.trim().is_empty() {
            errors.push("Activity name is required".to_string());
        }
        if self.target.is_sign_negative() {
            errors.push(format!("{}: Target cannot be negative", name));
        }
        if self.achieved.is_sign_negative() {
            errors.push(format!("{}: Achieved cannot be negative", name));
        }
        if self.cumulative.is_sign_negative() {
            errors.push(format!("{}: Cumulative cannot be negative", name));
        }
        if !self.target.is_zero()
            && !self.target.is_sign_negative()
            && self.achieved > self.target
        {
            errors.push(format!("{}: Achieved quantity cannot exceed target", name));
        }

        errors
    }
}

/// One activity line in a report response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub activity_name: String,
    pub unit: String,
    pub target: Decimal,
    pub achieved: Decimal,
    pub cumulative: Decimal,
    pub remarks: Option<String>,
}

impl From<crate::entity::report_activity::Model> for ActivityResponse {
    fn from(m: crate::entity::report_activity::Model) -> Self {
        Self {
            id: m.id,
            activity_name: m.activity_name,
            unit: m.unit,
            target: m.target,
            achieved: m.achieved,
            cumulative: m.cumulative,
            remarks: m.remarks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_fixed_activity_order_is_stable() {
        let names: Vec<&str> = FIXED_ACTIVITIES.iter().map(|(n, _)| *n).collect();
        assert_eq!(names[0], "Segment Casting");
        assert_eq!(names[4], "Quality Inspection");
        assert_eq!(names[9], "Steel Fixing");
        assert_eq!(names.len(), 10);
    }

    fn line(target: i64, achieved: i64, cumulative: i64) -> ActivityInput {
        ActivityInput {
            activity_name: "Concrete Work".to_string(),
            unit: "Cu.m".to_string(),
            target: Decimal::from(target),
            achieved: Decimal::from(achieved),
            cumulative: Decimal::from(cumulative),
            remarks: None,
        }
    }

    #[test]
    fn test_valid_line_passes() {
        assert!(line(10, 8, 18).validate().is_empty());
    }

    #[test]
    fn test_negative_quantities_rejected() {
        let errors = line(-1, -2, -3).validate();
        assert!(errors.iter().any(|e| e.contains("Target cannot be negative")));
        assert!(errors.iter().any(|e| e.contains("Achieved cannot be negative")));
        assert!(errors.iter().any(|e| e.contains("Cumulative cannot be negative")));
    }

    #[test]
    fn test_achieved_exceeding_target_rejected() {
        let errors = line(10, 12, 30).validate();
        assert!(errors.iter().any(|e| e.contains("cannot exceed target")));
        // target = 0 means "no target set"; achieved may still be reported
        assert!(line(0, 12, 30).validate().is_empty());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut a = line(10, 8, 18);
        a.activity_name = "  ".to_string();
        let errors = a.validate();
        assert!(errors.iter().any(|e| e.contains("Activity name is required")));
    }

    #[test]
    fn test_has_data() {
        let mut a = ActivityInput {
            activity_name: "Concrete Work".to_string(),
            unit: "Cu.m".to_string(),
            target: Decimal::ZERO,
            achieved: Decimal::ZERO,
            cumulative: Decimal::ZERO,
            remarks: None,
        };
        assert!(!a.has_data());
        a.cumulative = Decimal::new(150, 1); // 15.0
        assert!(a.has_data());
    }
}
