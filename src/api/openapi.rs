//! OpenAPI documentation configuration.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::config::{SERVICE_KEY_HEADER, SESSION_TOKEN_HEADER};
use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "DPR Server",
        version = "0.4.0",
        description = "Daily progress report server for construction sites: report capture, media storage, DPR workbook export and automated email dispatch"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    modifiers(&SecuritySchemes),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Auth endpoints
        api::auth::login,
        api::auth::logout,
        api::auth::me,
        // User endpoints
        api::users::create_user,
        api::users::list_users,
        api::users::get_user,
        api::users::update_user,
        api::users::deactivate_user,
        api::users::delete_user,
        // Report endpoints
        api::reports::save_report,
        api::reports::list_reports,
        api::reports::get_report,
        api::reports::delete_report,
        api::activities::list_activities,
        api::activities::update_activity,
        api::activities::delete_activity,
        // Media endpoints
        api::media::upload_media,
        api::media::list_media,
        api::media::download_media,
        api::media::delete_media,
        // Recipient + log endpoints
        api::recipients::create_recipient,
        api::recipients::list_recipients,
        api::recipients::update_recipient,
        api::recipients::delete_recipient,
        api::recipients::list_email_logs,
        // Export + metrics endpoints
        api::export::export_dpr,
        api::metrics::dashboard_metrics,
        api::metrics::site_metrics,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Auth
            models::LoginRequest,
            models::LoginResponse,
            // Users
            models::CreateUserRequest,
            models::UpdateUserRequest,
            models::UserResponse,
            // Reports
            models::ActivityInput,
            models::ActivityResponse,
            models::SaveReportRequest,
            models::ReportSummary,
            models::ReportListResponse,
            models::ReportDetailResponse,
            // Media
            models::MediaFileResponse,
            // Recipients + logs
            models::CreateRecipientRequest,
            models::UpdateRecipientRequest,
            models::RecipientResponse,
            models::EmailLogResponse,
            // Metrics
            api::metrics::DashboardMetrics,
            api::metrics::SiteMetrics,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Auth", description = "Sessions and identity"),
        (name = "Users", description = "User management"),
        (name = "Reports", description = "Daily progress reports"),
        (name = "Media", description = "Report photos and videos"),
        (name = "Recipients", description = "Email recipients and dispatch logs"),
        (name = "Export", description = "DPR workbook export"),
        (name = "Metrics", description = "Dashboard metrics")
    )
)]
pub struct ApiDoc;

/// Registers the session-token and service-key header schemes.
struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(SESSION_TOKEN_HEADER))),
            );
            components.add_security_scheme(
                "service_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(SERVICE_KEY_HEADER))),
            );
        }
    }
}
