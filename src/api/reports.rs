//! Daily report endpoints.

use actix_web::{HttpResponse, delete, get, put, web};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::{
    ActivityResponse, ListReportsQuery, ReportDetailResponse, ReportListResponse, ReportSummary,
    SaveReportRequest,
};

/// Configure report routes.
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(save_report)
        .service(list_reports)
        .service(get_report)
        .service(delete_report);
}

fn detail_response(
    report: crate::entity::daily_report::Model,
    activities: Vec<crate::entity::report_activity::Model>,
) -> ReportDetailResponse {
    ReportDetailResponse {
        report: ReportSummary::from(report),
        activities: activities.into_iter().map(ActivityResponse::from).collect(),
    }
}

/// Save the day's report for a site.
///
/// Idempotent on (report_date, site_code): resubmitting replaces the
/// caller's own report and its activities. A report owned by another
/// engineer yields 409.
#[utoipa::path(
    put,
    path = "/api/v1/reports",
    tag = "Reports",
    request_body = SaveReportRequest,
    responses(
        (status = 200, description = "Report saved", body = ReportDetailResponse),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 401, description = "Not a site engineer", body = crate::error::ErrorResponse),
        (status = 409, description = "Report exists for this site and date", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[put("/reports")]
pub async fn save_report(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    body: web::Json<SaveReportRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let errors = req.validate(Utc::now().date_naive());
    if !errors.is_empty() {
        return Err(AppError::InvalidInput(errors.join("; ")));
    }

    let (report, activities) = db::reports::save_report(pool.connection(), &auth.actor, req).await?;

    tracing::info!(
        report_date = %report.report_date,
        site = %report.site_code,
        activities = activities.len(),
        "Report saved"
    );

    Ok(HttpResponse::Ok().json(detail_response(report, activities)))
}

/// List reports visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    tag = "Reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "Reports", body = ReportListResponse)
    ),
    security(("session_token" = []))
)]
#[get("/reports")]
pub async fn list_reports(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    query: web::Query<ListReportsQuery>,
) -> AppResult<HttpResponse> {
    let (reports, total) = db::reports::list_reports(pool.connection(), &auth.actor, &query).await?;

    Ok(HttpResponse::Ok().json(ReportListResponse {
        reports: reports.into_iter().map(ReportSummary::from).collect(),
        total,
    }))
}

/// Get one report with its activities.
#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}",
    tag = "Reports",
    params(("id" = Uuid, Path, description = "Report UUID")),
    responses(
        (status = 200, description = "Report", body = ReportDetailResponse),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[get("/reports/{id}")]
pub async fn get_report(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let (report, activities) =
        db::reports::get_report_with_activities(pool.connection(), &auth.actor, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {}", id)))?;

    Ok(HttpResponse::Ok().json(detail_response(report, activities)))
}

/// Delete a report. Admin only; activities and media rows cascade.
#[utoipa::path(
    delete,
    path = "/api/v1/reports/{id}",
    tag = "Reports",
    params(("id" = Uuid, Path, description = "Report UUID")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[delete("/reports/{id}")]
pub async fn delete_report(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let affected = db::reports::delete_report(pool.connection(), &auth.actor, id).await?;
    if affected == 0 {
        return Err(AppError::NotFound(format!("Report {}", id)));
    }
    Ok(HttpResponse::NoContent().finish())
}
