//! Database operations for email dispatch logs.

use chrono::{NaiveDate, Utc};
use sea_orm::*;
use uuid::Uuid;

use crate::entity::email_log::{self, Entity as EmailLog};
use crate::error::{AppError, AppResult};
use crate::models::email_log::EmailStatus;
use crate::policy::{self, Actor, Operation};

/// Record one dispatch attempt. Admin or service only.
pub async fn insert_log(
    db: &DatabaseConnection,
    actor: &Actor,
    recipient_email: &str,
    subject: &str,
    report_date: NaiveDate,
    attachment_name: Option<&str>,
    status: EmailStatus,
    error_message: Option<&str>,
) -> AppResult<email_log::Model> {
    if policy::email_logs_scope(actor, Operation::Insert).is_denied() {
        return Err(AppError::Unauthorized(
            "Only admins may write email logs".to_string(),
        ));
    }

    let model = email_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        recipient_email: Set(recipient_email.to_string()),
        subject: Set(subject.to_string()),
        report_date: Set(report_date),
        attachment_name: Set(attachment_name.map(str::to_string)),
        status: Set(status.as_str().to_string()),
        error_message: Set(error_message.map(str::to_string)),
        created_at: Set(Utc::now()),
    };

    Ok(model.insert(db).await?)
}

/// List logs, optionally for one report date. Admin or service only.
pub async fn list_logs(
    db: &DatabaseConnection,
    actor: &Actor,
    report_date: Option<NaiveDate>,
) -> AppResult<Vec<email_log::Model>> {
    if policy::email_logs_scope(actor, Operation::Select).is_denied() {
        return Ok(Vec::new());
    }

    let mut select = EmailLog::find();
    if let Some(date) = report_date {
        select = select.filter(email_log::Column::ReportDate.eq(date));
    }

    Ok(select
        .order_by_desc(email_log::Column::CreatedAt)
        .all(db)
        .await?)
}
