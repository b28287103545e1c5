//! User and authentication models.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::policy::Role;

/// Login request. Project managers and admins authenticate with
/// username/password; site engineers use the passwordless full-name +
/// site-code flow.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum LoginRequest {
    Credentials {
        username: String,
        #[schema(value_type = String)]
        password: SecretString,
    },
    Engineer {
        full_name: String,
        site_code: String,
    },
}

/// Successful login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Opaque session token; send back in the X-Session-Token header.
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

/// Admin request to create a user.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub site_location: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub password: Option<SecretString>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Partial user update. `role` changes are admin-only regardless of row
/// ownership.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub site_location: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub password: Option<SecretString>,
    #[serde(default)]
    pub email: Option<String>,
}

/// User info returned by the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub role: String,
    pub site_location: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::user::Model> for UserResponse {
    fn from(m: crate::entity::user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            full_name: m.full_name,
            role: m.role,
            site_location: m.site_location,
            email: m.email,
            is_active: m.is_active,
            last_login: m.last_login,
            created_at: m.created_at,
        }
    }
}

/// Query parameters for listing users.
#[derive(Debug, Deserialize, utoipa::IntoParams, ToSchema)]
pub struct ListUsersQuery {
    pub role: Option<Role>,
    pub site: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_forms_deserialize() {
        let creds: LoginRequest =
            serde_json::from_str(r#"{"username": "pm1", "password": "secret"}"#).unwrap();
        assert!(matches!(creds, LoginRequest::Credentials { .. }));

        let eng: LoginRequest =
            serde_json::from_str(r#"{"full_name": "A. Kumar", "site_code": "TCB-407"}"#).unwrap();
        assert!(matches!(eng, LoginRequest::Engineer { .. }));
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::ProjectManager).unwrap(),
            "\"project_manager\""
        );
        let parsed: Role = serde_json::from_str("\"engineer\"").unwrap();
        assert_eq!(parsed, Role::Engineer);
    }
}
