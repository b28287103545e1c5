//! Email recipient and dispatch-log endpoints. Admin only.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateRecipientRequest, EmailLogResponse, RecipientResponse, UpdateRecipientRequest,
};

/// Configure recipient and email-log routes.
pub fn configure_recipient_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_recipient)
        .service(list_recipients)
        .service(update_recipient)
        .service(delete_recipient)
        .service(list_email_logs);
}

/// Add a dispatch recipient.
#[utoipa::path(
    post,
    path = "/api/v1/recipients",
    tag = "Recipients",
    request_body = CreateRecipientRequest,
    responses(
        (status = 201, description = "Recipient added", body = RecipientResponse),
        (status = 401, description = "Not an admin", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[post("/recipients")]
pub async fn create_recipient(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    body: web::Json<CreateRecipientRequest>,
) -> AppResult<HttpResponse> {
    let recipient =
        db::recipients::create_recipient(pool.connection(), &auth.actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(RecipientResponse::from(recipient)))
}

/// List all recipients.
#[utoipa::path(
    get,
    path = "/api/v1/recipients",
    tag = "Recipients",
    responses(
        (status = 200, description = "Recipients", body = Vec<RecipientResponse>)
    ),
    security(("session_token" = []))
)]
#[get("/recipients")]
pub async fn list_recipients(
    pool: web::Data<DbPool>,
    auth: AuthSession,
) -> AppResult<HttpResponse> {
    let recipients = db::recipients::list_recipients(pool.connection(), &auth.actor).await?;
    let recipients: Vec<RecipientResponse> =
        recipients.into_iter().map(RecipientResponse::from).collect();
    Ok(HttpResponse::Ok().json(recipients))
}

/// Update a recipient (role, active flag, subscriptions).
#[utoipa::path(
    patch,
    path = "/api/v1/recipients/{id}",
    tag = "Recipients",
    params(("id" = Uuid, Path, description = "Recipient UUID")),
    request_body = UpdateRecipientRequest,
    responses(
        (status = 200, description = "Updated recipient", body = RecipientResponse),
        (status = 404, description = "Recipient not found", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[patch("/recipients/{id}")]
pub async fn update_recipient(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    path: web::Path<Uuid>,
    body: web::Json<UpdateRecipientRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let recipient =
        db::recipients::update_recipient(pool.connection(), &auth.actor, id, body.into_inner())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Recipient {}", id)))?;
    Ok(HttpResponse::Ok().json(RecipientResponse::from(recipient)))
}

/// Remove a recipient.
#[utoipa::path(
    delete,
    path = "/api/v1/recipients/{id}",
    tag = "Recipients",
    params(("id" = Uuid, Path, description = "Recipient UUID")),
    responses(
        (status = 204, description = "Recipient removed"),
        (status = 404, description = "Recipient not found", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[delete("/recipients/{id}")]
pub async fn delete_recipient(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let affected = db::recipients::delete_recipient(pool.connection(), &auth.actor, id).await?;
    if affected == 0 {
        return Err(AppError::NotFound(format!("Recipient {}", id)));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Query parameters for listing email logs.
#[derive(Debug, Deserialize, IntoParams)]
pub struct EmailLogQuery {
    /// Restrict to one report date.
    pub report_date: Option<NaiveDate>,
}

/// List email dispatch logs.
#[utoipa::path(
    get,
    path = "/api/v1/email-logs",
    tag = "Recipients",
    params(EmailLogQuery),
    responses(
        (status = 200, description = "Dispatch logs", body = Vec<EmailLogResponse>)
    ),
    security(("session_token" = []))
)]
#[get("/email-logs")]
pub async fn list_email_logs(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    query: web::Query<EmailLogQuery>,
) -> AppResult<HttpResponse> {
    let logs =
        db::email_logs::list_logs(pool.connection(), &auth.actor, query.report_date).await?;
    let logs: Vec<EmailLogResponse> = logs.into_iter().map(EmailLogResponse::from).collect();
    Ok(HttpResponse::Ok().json(logs))
}
