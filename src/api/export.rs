//! DPR workbook export endpoint.

use actix_web::{HttpResponse, get, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::AuthSession;
use crate::config::Config;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::services::{aggregation, excel};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Configure export routes.
pub fn configure_export_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(export_dpr);
}

/// Query parameters for the DPR export.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ExportQuery {
    /// Inclusive start of the date range.
    pub from: NaiveDate,
    /// Inclusive end of the date range.
    pub to: NaiveDate,
    /// Comma-separated site codes. Defaults to every configured site.
    pub sites: Option<String>,
}

/// Export the DPR workbook for a date range.
///
/// Returns the xlsx file as an attachment named `DDMMYYYY-DPR.xlsx` after
/// the range's end date. A range with no reports still yields a valid
/// zero-filled workbook.
#[utoipa::path(
    get,
    path = "/api/v1/export/dpr",
    tag = "Export",
    params(ExportQuery),
    responses(
        (status = 200, description = "DPR workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Invalid range or site", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[get("/export/dpr")]
pub async fn export_dpr(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    auth: AuthSession,
    query: web::Query<ExportQuery>,
) -> AppResult<HttpResponse> {
    if query.from > query.to {
        return Err(AppError::InvalidInput(
            "Range start must not be after range end".to_string(),
        ));
    }

    let sites: Vec<String> = match query.sites {
        Some(ref list) => {
            let requested: Vec<String> = list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            for site in &requested {
                if !config.sites.contains(site) {
                    return Err(AppError::InvalidInput(format!("Unknown site: {}", site)));
                }
            }
            requested
        }
        None => config.sites.clone(),
    };

    let reports = db::reports::fetch_range_with_activities(
        pool.connection(),
        &auth.actor,
        &sites,
        query.from,
        query.to,
    )
    .await?;

    let grid = aggregation::aggregate(&reports, &sites, query.from, query.to);
    let bytes = excel::render_dpr(&grid)?;
    let filename = excel::dpr_filename(query.to);

    tracing::info!(
        from = %query.from,
        to = %query.to,
        sites = sites.len(),
        reports = grid.report_count(),
        "DPR exported"
    );

    Ok(HttpResponse::Ok()
        .content_type(XLSX_MIME)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(bytes))
}
