//! Email recipient models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Request to add a dispatch recipient.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRecipientRequest {
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    /// Defaults to ["daily"].
    #[serde(default = "default_report_types")]
    pub report_types: Vec<String>,
}

fn default_report_types() -> Vec<String> {
    vec!["daily".to_string()]
}

/// Partial recipient update.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRecipientRequest {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub report_types: Option<Vec<String>>,
}

/// Recipient returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipientResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Option<String>,
    pub active: bool,
    pub report_types: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::email_recipient::Model> for RecipientResponse {
    fn from(m: crate::entity::email_recipient::Model) -> Self {
        let report_types = m
            .report_types
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            id: m.id,
            email: m.email,
            role: m.role,
            active: m.active,
            report_types,
            created_at: m.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults_to_daily() {
        let req: CreateRecipientRequest =
            serde_json::from_str(r#"{"email": "pm@example.com"}"#).unwrap();
        assert_eq!(req.report_types, vec!["daily".to_string()]);
    }
}
