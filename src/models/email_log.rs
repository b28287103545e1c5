//! Email dispatch log models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Dispatch outcome for one recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailStatus {
    Pending,
    Sent,
    Failed,
}

impl EmailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailStatus::Pending => "pending",
            EmailStatus::Sent => "sent",
            EmailStatus::Failed => "failed",
        }
    }
}

/// Email log entry returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmailLogResponse {
    pub id: Uuid,
    pub recipient_email: String,
    pub subject: String,
    pub report_date: NaiveDate,
    pub attachment_name: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::email_log::Model> for EmailLogResponse {
    fn from(m: crate::entity::email_log::Model) -> Self {
        Self {
            id: m.id,
            recipient_email: m.recipient_email,
            subject: m.subject,
            report_date: m.report_date,
            attachment_name: m.attachment_name,
            status: m.status,
            error_message: m.error_message,
            created_at: m.created_at,
        }
    }
}
