//! Individual activity-row endpoints.
//!
//! The bulk path is `PUT /reports` (replace-all); these endpoints let the
//! owning engineer correct a single line after submission without
//! re-entering the whole report.

use actix_web::{HttpResponse, delete, get, patch, web};
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::{ActivityInput, ActivityResponse};

/// Configure activity routes.
pub fn configure_activity_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_activities)
        .service(update_activity)
        .service(delete_activity);
}

/// List a report's activities, scoped by the parent report's read rules.
/// A report the caller may not see yields an empty list.
#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}/activities",
    tag = "Reports",
    params(("id" = Uuid, Path, description = "Report UUID")),
    responses(
        (status = 200, description = "Activities", body = Vec<ActivityResponse>)
    ),
    security(("session_token" = []))
)]
#[get("/reports/{id}/activities")]
pub async fn list_activities(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let report_id = path.into_inner();
    let activities =
        db::activities::list_by_report(pool.connection(), &auth.actor, report_id).await?;

    Ok(HttpResponse::Ok().json(
        activities
            .into_iter()
            .map(ActivityResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Correct one activity line. Only the parent report's engineer may do this.
#[utoipa::path(
    patch,
    path = "/api/v1/activities/{id}",
    tag = "Reports",
    params(("id" = Uuid, Path, description = "Activity UUID")),
    request_body = ActivityInput,
    responses(
        (status = 200, description = "Activity updated", body = ActivityResponse),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 404, description = "Activity not found", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[patch("/activities/{id}")]
pub async fn update_activity(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    path: web::Path<Uuid>,
    body: web::Json<ActivityInput>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let input = body.into_inner();

    let errors = input.validate();
    if !errors.is_empty() {
        return Err(AppError::InvalidInput(errors.join("; ")));
    }

    let updated = db::activities::update_activity(pool.connection(), &auth.actor, id, input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Activity {}", id)))?;

    Ok(HttpResponse::Ok().json(ActivityResponse::from(updated)))
}

/// Remove one activity line from the caller's own report.
#[utoipa::path(
    delete,
    path = "/api/v1/activities/{id}",
    tag = "Reports",
    params(("id" = Uuid, Path, description = "Activity UUID")),
    responses(
        (status = 204, description = "Activity deleted"),
        (status = 404, description = "Activity not found", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[delete("/activities/{id}")]
pub async fn delete_activity(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let affected = db::activities::delete_activity(pool.connection(), &auth.actor, id).await?;
    if affected == 0 {
        return Err(AppError::NotFound(format!("Activity {}", id)));
    }
    Ok(HttpResponse::NoContent().finish())
}
