//! Database operations for email recipients.

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::email_recipient::{self, Entity as Recipient};
use crate::error::{AppError, AppResult};
use crate::models::recipient::{CreateRecipientRequest, UpdateRecipientRequest};
use crate::policy::{self, Actor, Operation};

use super::stamp;

/// Add a recipient. Admin or service only; duplicate email surfaces as a
/// conflict from the unique index.
pub async fn create_recipient(
    db: &DatabaseConnection,
    actor: &Actor,
    req: CreateRecipientRequest,
) -> AppResult<email_recipient::Model> {
    if policy::recipients_scope(actor, Operation::Insert).is_denied() {
        return Err(AppError::Unauthorized(
            "Only admins may manage recipients".to_string(),
        ));
    }

    let now = Utc::now();
    let model = email_recipient::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(req.email),
        role: Set(req.role),
        active: Set(true),
        report_types: Set(serde_json::json!(req.report_types)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(model.insert(db).await?)
}

/// List all recipients. Admin or service only.
pub async fn list_recipients(
    db: &DatabaseConnection,
    actor: &Actor,
) -> AppResult<Vec<email_recipient::Model>> {
    if policy::recipients_scope(actor, Operation::Select).is_denied() {
        return Ok(Vec::new());
    }

    Ok(Recipient::find()
        .order_by_asc(email_recipient::Column::Email)
        .all(db)
        .await?)
}

/// Active recipients subscribed to the given report type. Used by the
/// dispatch job under the service identity.
pub async fn active_recipients_for(
    db: &DatabaseConnection,
    actor: &Actor,
    report_type: &str,
) -> AppResult<Vec<email_recipient::Model>> {
    if policy::recipients_scope(actor, Operation::Select).is_denied() {
        return Ok(Vec::new());
    }

    let recipients = Recipient::find()
        .filter(email_recipient::Column::Active.eq(true))
        .all(db)
        .await?;

    // report_types is a small JSONB array; filter in memory.
    Ok(recipients
        .into_iter()
        .filter(|r| {
            r.report_types
                .as_array()
                .is_some_and(|arr| arr.iter().any(|v| v.as_str() == Some(report_type)))
        })
        .collect())
}

/// Update a recipient. Returns None when missing or out of scope.
pub async fn update_recipient(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    req: UpdateRecipientRequest,
) -> AppResult<Option<email_recipient::Model>> {
    if policy::recipients_scope(actor, Operation::Update).is_denied() {
        return Ok(None);
    }

    let Some(existing) = Recipient::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let previous_updated_at = existing.updated_at;
    let mut active: email_recipient::ActiveModel = existing.into();
    if let Some(role) = req.role {
        active.role = Set(Some(role));
    }
    if let Some(is_active) = req.active {
        active.active = Set(is_active);
    }
    if let Some(types) = req.report_types {
        active.report_types = Set(serde_json::json!(types));
    }
    active.updated_at = Set(stamp::touch(previous_updated_at));

    Ok(Some(active.update(db).await?))
}

/// Delete a recipient. Returns affected rows.
pub async fn delete_recipient(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> AppResult<u64> {
    if policy::recipients_scope(actor, Operation::Delete).is_denied() {
        return Ok(0);
    }

    let result = Recipient::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected)
}
