//! Database operations for media files.
//!
//! Media access is owner-only: insert/select/delete all require the parent
//! report's engineer. Reviewers get no bypass here (see policy module).

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::daily_report::Entity as Report;
use crate::entity::media_file::{self, Entity as MediaFile};
use crate::error::{AppError, AppResult};
use crate::policy::{self, Actor, Operation};

/// Insert a media file record. The uploader must own the parent report.
#[allow(clippy::too_many_arguments)]
pub async fn insert_media(
    db: &DatabaseConnection,
    actor: &Actor,
    report_id: Uuid,
    activity_name: Option<String>,
    file_name: String,
    file_path: String,
    file_type: String,
    file_size: i64,
) -> AppResult<media_file::Model> {
    let scope = policy::media_scope(actor, Operation::Insert);

    let Some(report) = Report::find_by_id(report_id).one(db).await? else {
        return Err(AppError::NotFound("Report".to_string()));
    };

    if !scope.permits_owner(report.engineer_id) {
        // Denied writes are indistinguishable from a missing report.
        return Err(AppError::NotFound("Report".to_string()));
    }

    let model = media_file::ActiveModel {
        id: Set(Uuid::new_v4()),
        report_id: Set(report_id),
        activity_name: Set(activity_name),
        file_name: Set(file_name),
        file_path: Set(file_path),
        file_type: Set(file_type),
        file_size: Set(file_size),
        uploaded_by: Set(actor.id),
        created_at: Set(Utc::now()),
    };

    Ok(model.insert(db).await?)
}

/// List media files for a report, owner-only.
pub async fn list_by_report(
    db: &DatabaseConnection,
    actor: &Actor,
    report_id: Uuid,
) -> AppResult<Vec<media_file::Model>> {
    let scope = policy::media_scope(actor, Operation::Select);
    if scope.is_denied() {
        return Ok(Vec::new());
    }

    let Some(report) = Report::find_by_id(report_id).one(db).await? else {
        return Ok(Vec::new());
    };
    if !scope.permits_owner(report.engineer_id) {
        return Ok(Vec::new());
    }

    Ok(MediaFile::find()
        .filter(media_file::Column::ReportId.eq(report_id))
        .order_by_asc(media_file::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Fetch one media row if the actor owns its parent report.
pub async fn get_media(
    db: &DatabaseConnection,
    actor: &Actor,
    media_id: Uuid,
) -> AppResult<Option<media_file::Model>> {
    let scope = policy::media_scope(actor, Operation::Select);
    if scope.is_denied() {
        return Ok(None);
    }

    let Some(media) = MediaFile::find_by_id(media_id).one(db).await? else {
        return Ok(None);
    };

    let Some(report) = Report::find_by_id(media.report_id).one(db).await? else {
        return Ok(None);
    };
    if !scope.permits_owner(report.engineer_id) {
        return Ok(None);
    }

    Ok(Some(media))
}

/// Delete a media row, owner-only. Returns the deleted row's object key so
/// the caller can remove the stored object as well.
pub async fn delete_media(
    db: &DatabaseConnection,
    actor: &Actor,
    media_id: Uuid,
) -> AppResult<Option<String>> {
    let Some(media) = get_media(db, actor, media_id).await? else {
        return Ok(None);
    };

    let file_path = media.file_path.clone();
    let result = MediaFile::delete_by_id(media.id).exec(db).await?;

    if result.rows_affected == 0 {
        return Ok(None);
    }

    Ok(Some(file_path))
}
