//! Media upload and retrieval endpoints.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, delete, get, post, web};
use futures_util::StreamExt;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::config::Config;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::MediaFileResponse;
use crate::models::media::is_allowed_media_type;
use crate::services::Storage;

/// Configure media routes.
pub fn configure_media_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(upload_media)
        .service(list_media)
        .service(download_media)
        .service(delete_media);
}

/// Upload a photo or video for a report.
///
/// Multipart form with one file field; an optional `activity_name` text
/// field tags the file to an activity. Only the report's own engineer may
/// upload.
#[utoipa::path(
    post,
    path = "/api/v1/reports/{id}/media",
    tag = "Media",
    params(("id" = Uuid, Path, description = "Report UUID")),
    responses(
        (status = 201, description = "Media stored", body = MediaFileResponse),
        (status = 400, description = "No file or unsupported type", body = crate::error::ErrorResponse),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[post("/reports/{id}/media")]
pub async fn upload_media(
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    config: web::Data<Config>,
    auth: AuthSession,
    path: web::Path<Uuid>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let report_id = path.into_inner();
    let max_size = config.max_upload_size;

    let mut activity_name: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut data: Vec<u8> = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| AppError::InvalidInput("Missing content disposition".to_string()))?;
        let field_name = content_disposition.get_name().map(str::to_string);
        let filename = content_disposition.get_filename().map(str::to_string);

        if field_name.as_deref() == Some("activity_name") && filename.is_none() {
            let mut buf = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk =
                    chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
                buf.extend_from_slice(&chunk);
            }
            if let Ok(value) = String::from_utf8(buf) {
                let value = value.trim().to_string();
                if !value.is_empty() {
                    activity_name = Some(value);
                }
            }
            continue;
        }

        let Some(filename) = filename else {
            // Unknown non-file field; drain and ignore.
            while let Some(chunk) = field.next().await {
                let _ = chunk;
            }
            continue;
        };

        if file_name.is_some() {
            return Err(AppError::InvalidInput(
                "Upload exactly one file per request".to_string(),
            ));
        }

        let mime = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if !is_allowed_media_type(&mime) {
            return Err(AppError::InvalidInput(format!(
                "Unsupported media type: {}",
                mime
            )));
        }

        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            if data.len() + chunk.len() > max_size {
                return Err(AppError::InvalidInput(format!(
                    "File exceeds maximum upload size of {} bytes",
                    max_size
                )));
            }
            data.extend_from_slice(&chunk);
        }

        file_name = Some(filename);
        content_type = Some(mime);
    }

    let file_name = file_name
        .ok_or_else(|| AppError::InvalidInput("No file found in upload".to_string()))?;
    let content_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    if data.is_empty() {
        return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
    }

    let key = Storage::media_key(report_id, &file_name);
    let file_size = data.len() as i64;

    // Database row first: it carries the ownership check. A denied or
    // missing report never reaches S3.
    let media = db::media::insert_media(
        pool.connection(),
        &auth.actor,
        report_id,
        activity_name,
        file_name,
        key.clone(),
        content_type.clone(),
        file_size,
    )
    .await?;

    if let Err(e) = storage.put(&key, data, Some(&content_type)).await {
        // Roll the row back so listings never reference a missing object.
        let _ = db::media::delete_media(pool.connection(), &auth.actor, media.id).await;
        return Err(e);
    }

    tracing::info!(report = %report_id, key = %key, size = file_size, "Media stored");

    Ok(HttpResponse::Created().json(MediaFileResponse::from(media)))
}

/// List a report's media files. Owner only.
#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}/media",
    tag = "Media",
    params(("id" = Uuid, Path, description = "Report UUID")),
    responses(
        (status = 200, description = "Media files", body = Vec<MediaFileResponse>)
    ),
    security(("session_token" = []))
)]
#[get("/reports/{id}/media")]
pub async fn list_media(
    pool: web::Data<DbPool>,
    auth: AuthSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let files = db::media::list_by_report(pool.connection(), &auth.actor, path.into_inner()).await?;
    let files: Vec<MediaFileResponse> = files.into_iter().map(MediaFileResponse::from).collect();
    Ok(HttpResponse::Ok().json(files))
}

/// Download one media file. Owner only.
#[utoipa::path(
    get,
    path = "/api/v1/media/{id}/download",
    tag = "Media",
    params(("id" = Uuid, Path, description = "Media UUID")),
    responses(
        (status = 200, description = "File bytes"),
        (status = 404, description = "Media not found", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[get("/media/{id}/download")]
pub async fn download_media(
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    auth: AuthSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let media = db::media::get_media(pool.connection(), &auth.actor, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Media {}", id)))?;

    let (bytes, content_type) = storage.get(&media.file_path).await?;

    Ok(HttpResponse::Ok()
        .content_type(content_type.unwrap_or_else(|| media.file_type.clone()))
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", media.file_name),
        ))
        .body(bytes))
}

/// Delete one media file. Owner only; removes the stored object as well.
#[utoipa::path(
    delete,
    path = "/api/v1/media/{id}",
    tag = "Media",
    params(("id" = Uuid, Path, description = "Media UUID")),
    responses(
        (status = 204, description = "Media deleted"),
        (status = 404, description = "Media not found", body = crate::error::ErrorResponse)
    ),
    security(("session_token" = []))
)]
#[delete("/media/{id}")]
pub async fn delete_media(
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    auth: AuthSession,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let key = db::media::delete_media(pool.connection(), &auth.actor, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Media {}", id)))?;

    // Best effort: the row is gone either way.
    if let Err(e) = storage.delete(&key).await {
        tracing::warn!(key = %key, error = %e, "Failed to delete stored object");
    }

    Ok(HttpResponse::NoContent().finish())
}
