//! Dashboard metrics endpoints.

use actix_web::{HttpResponse, get, web};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::AuthSession;
use crate::config::Config;
use crate::db::{self, DbPool};
use crate::db::reports::ReportWithActivities;
use crate::error::AppResult;
use crate::models::FIXED_ACTIVITIES;

/// Reports before the project epoch do not exist; used as the open start
/// of "all time" ranges.
const PROJECT_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 1) {
    Some(date) => date,
    None => panic!("invalid project epoch"),
};

/// Configure metrics routes.
pub fn configure_metrics_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard_metrics).service(site_metrics);
}

/// Headline figures for the PM dashboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardMetrics {
    pub total_sites: usize,
    pub total_reports: usize,
    pub reports_today: usize,
    /// Achieved as a percentage of target, rounded to 2 places.
    pub overall_progress: Decimal,
    pub total_target: Decimal,
    pub total_achieved: Decimal,
}

/// Per-site figures for a date range.
#[derive(Debug, Serialize, ToSchema)]
pub struct SiteMetrics {
    pub site_code: String,
    pub reports_count: usize,
    pub target: Decimal,
    pub achieved: Decimal,
    /// Maximum cumulative value seen in the range.
    pub cumulative: Decimal,
    pub progress: Decimal,
    pub status: &'static str,
    pub last_report: Option<NaiveDate>,
}

/// Query parameters for site metrics.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SiteMetricsQuery {
    /// Inclusive start; defaults to the project epoch.
    pub from: Option<NaiveDate>,
    /// Inclusive end; defaults to today.
    pub to: Option<NaiveDate>,
}

fn progress_pct(target: Decimal, achieved: Decimal) -> Decimal {
    if target > Decimal::ZERO {
        (achieved / target * Decimal::from(100)).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

fn status_for(reports_count: usize, progress: Decimal) -> &'static str {
    if reports_count == 0 {
        return "no_data";
    }
    if progress >= Decimal::from(90) {
        "excellent"
    } else if progress >= Decimal::from(70) {
        "on_track"
    } else if progress >= Decimal::from(50) {
        "needs_attention"
    } else {
        "critical"
    }
}

/// Overall dashboard metrics across all configured sites.
#[utoipa::path(
    get,
    path = "/api/v1/metrics/dashboard",
    tag = "Metrics",
    responses(
        (status = 200, description = "Dashboard metrics", body = DashboardMetrics)
    ),
    security(("session_token" = []))
)]
#[get("/metrics/dashboard")]
pub async fn dashboard_metrics(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    auth: AuthSession,
) -> AppResult<HttpResponse> {
    let today = Utc::now().date_naive();
    let reports = db::reports::fetch_range_with_activities(
        pool.connection(),
        &auth.actor,
        &config.sites,
        PROJECT_EPOCH,
        today,
    )
    .await?;

    let reports_today = reports
        .iter()
        .filter(|(r, _)| r.report_date == today)
        .count();

    let mut total_target = Decimal::ZERO;
    let mut total_achieved = Decimal::ZERO;
    for (_, activities) in &reports {
        for activity in activities {
            total_target += activity.target;
            total_achieved += activity.achieved;
        }
    }

    Ok(HttpResponse::Ok().json(DashboardMetrics {
        total_sites: config.sites.len(),
        total_reports: reports.len(),
        reports_today,
        overall_progress: progress_pct(total_target, total_achieved),
        total_target,
        total_achieved,
    }))
}

/// Per-site metrics for a date range.
#[utoipa::path(
    get,
    path = "/api/v1/metrics/sites",
    tag = "Metrics",
    params(SiteMetricsQuery),
    responses(
        (status = 200, description = "Site metrics", body = Vec<SiteMetrics>)
    ),
    security(("session_token" = []))
)]
#[get("/metrics/sites")]
pub async fn site_metrics(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    auth: AuthSession,
    query: web::Query<SiteMetricsQuery>,
) -> AppResult<HttpResponse> {
    let from = query.from.unwrap_or(PROJECT_EPOCH);
    let to = query.to.unwrap_or_else(|| Utc::now().date_naive());

    let reports = db::reports::fetch_range_with_activities(
        pool.connection(),
        &auth.actor,
        &config.sites,
        from,
        to,
    )
    .await?;

    let metrics: Vec<SiteMetrics> = config
        .sites
        .iter()
        .map(|site| site_summary(site, &reports))
        .collect();

    Ok(HttpResponse::Ok().json(metrics))
}

fn site_summary(site_code: &str, reports: &[ReportWithActivities]) -> SiteMetrics {
    let site_reports: Vec<&ReportWithActivities> = reports
        .iter()
        .filter(|(r, _)| r.site_code == site_code)
        .collect();

    let mut target = Decimal::ZERO;
    let mut achieved = Decimal::ZERO;
    let mut cumulative = Decimal::ZERO;

    for (_, activities) in &site_reports {
        for activity in activities
            .iter()
            .filter(|a| FIXED_ACTIVITIES.iter().any(|(n, _)| *n == a.activity_name))
        {
            target += activity.target;
            achieved += activity.achieved;
            if activity.cumulative > cumulative {
                cumulative = activity.cumulative;
            }
        }
    }

    let last_report = site_reports.iter().map(|(r, _)| r.report_date).max();
    let progress = progress_pct(target, achieved);

    SiteMetrics {
        site_code: site_code.to_string(),
        reports_count: site_reports.len(),
        target,
        achieved,
        cumulative,
        progress,
        status: status_for(site_reports.len(), progress),
        last_report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_pct() {
        assert_eq!(
            progress_pct(Decimal::from(200), Decimal::from(150)),
            Decimal::from(75)
        );
        assert_eq!(progress_pct(Decimal::ZERO, Decimal::from(10)), Decimal::ZERO);
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(status_for(0, Decimal::from(100)), "no_data");
        assert_eq!(status_for(3, Decimal::from(95)), "excellent");
        assert_eq!(status_for(3, Decimal::from(70)), "on_track");
        assert_eq!(status_for(3, Decimal::from(50)), "needs_attention");
        assert_eq!(status_for(3, Decimal::from(10)), "critical");
    }
}
