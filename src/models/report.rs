//! Report request/response models and submission validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::activity::{ActivityInput, ActivityResponse};

/// Idempotent save request for one (report_date, site_code) report.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveReportRequest {
    pub report_date: NaiveDate,
    pub site_code: String,
    pub weather: String,
    pub total_workers: i32,
    #[serde(default)]
    pub remarks: Option<String>,
    pub activities: Vec<ActivityInput>,
}

impl SaveReportRequest {
    /// Validate a submission against `today`. Returns every problem found,
    /// not just the first.
    pub fn validate(&self, today: NaiveDate) -> Vec<String> {
        let mut errors = Vec::new();

        if self.report_date > today {
            errors.push("Report date cannot be in the future".to_string());
        }

        if self.weather.trim().is_empty() {
            errors.push("Weather condition is required".to_string());
        }

        if self.site_code.trim().is_empty() {
            errors.push("Site code is required".to_string());
        }

        if self.total_workers < 0 {
            errors.push("Total workers cannot be negative".to_string());
        }

        if self.activities.is_empty() {
            errors.push("At least one activity must be defined".to_string());
        } else if !self.activities.iter().any(|a| a.has_data()) {
            errors.push(
                "At least one activity must have data entered (target, achieved, or cumulative)"
                    .to_string(),
            );
        }

        for activity in &self.activities {
            errors.extend(activity.validate());
        }

        errors
    }
}

/// Query parameters for listing reports.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct ListReportsQuery {
    /// Restrict to one site code.
    pub site: Option<String>,
    /// Inclusive start of the date range.
    pub from: Option<NaiveDate>,
    /// Inclusive end of the date range.
    pub to: Option<NaiveDate>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

/// Report without activities, for list views.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportSummary {
    pub id: Uuid,
    pub report_date: NaiveDate,
    pub site_code: String,
    pub engineer_id: Uuid,
    pub weather: String,
    pub total_workers: i32,
    pub remarks: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<crate::entity::daily_report::Model> for ReportSummary {
    fn from(m: crate::entity::daily_report::Model) -> Self {
        Self {
            id: m.id,
            report_date: m.report_date,
            site_code: m.site_code,
            engineer_id: m.engineer_id,
            weather: m.weather,
            total_workers: m.total_workers,
            remarks: m.remarks,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Paginated list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReportListResponse {
    pub reports: Vec<ReportSummary>,
    pub total: u64,
}

/// Full report with its activities.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReportDetailResponse {
    #[serde(flatten)]
    pub report: ReportSummary,
    pub activities: Vec<ActivityResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn activity(target: i64, achieved: i64, cumulative: i64) -> ActivityInput {
        ActivityInput {
            activity_name: "Concrete Work".to_string(),
            unit: "Cu.m".to_string(),
            target: Decimal::from(target),
            achieved: Decimal::from(achieved),
            cumulative: Decimal::from(cumulative),
            remarks: None,
        }
    }

    fn request(activities: Vec<ActivityInput>) -> SaveReportRequest {
        SaveReportRequest {
            report_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            site_code: "TCB-407".to_string(),
            weather: "Sunny".to_string(),
            total_workers: 42,
            remarks: None,
            activities,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
    }

    #[test]
    fn test_valid_request_passes() {
        let req = request(vec![activity(10, 8, 18)]);
        assert!(req.validate(today()).is_empty());
    }

    #[test]
    fn test_future_date_rejected() {
        let mut req = request(vec![activity(10, 8, 18)]);
        req.report_date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let errors = req.validate(today());
        assert!(errors.iter().any(|e| e.contains("future")));
    }

    #[test]
    fn test_blank_weather_rejected() {
        let mut req = request(vec![activity(10, 8, 18)]);
        req.weather = "  ".to_string();
        let errors = req.validate(today());
        assert!(errors.iter().any(|e| e.contains("Weather")));
    }

    #[test]
    fn test_all_zero_activities_rejected() {
        let req = request(vec![activity(0, 0, 0)]);
        let errors = req.validate(today());
        assert!(errors.iter().any(|e| e.contains("at least one activity must have data")
            || e.contains("At least one activity must have data")));
    }

    #[test]
    fn test_achieved_exceeding_target_rejected() {
        let req = request(vec![activity(10, 12, 30)]);
        let errors = req.validate(today());
        assert!(errors.iter().any(|e| e.contains("cannot exceed target")));
    }

    #[test]
    fn test_achieved_without_target_allowed() {
        // target = 0 means "no target set"; achieved may still be reported
        let req = request(vec![activity(0, 12, 30)]);
        assert!(req.validate(today()).is_empty());
    }

    #[test]
    fn test_negative_workers_rejected() {
        let mut req = request(vec![activity(10, 8, 18)]);
        req.total_workers = -1;
        let errors = req.validate(today());
        assert!(errors.iter().any(|e| e.contains("workers")));
    }
}
