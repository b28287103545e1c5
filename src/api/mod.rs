//! API endpoint modules.

pub mod activities;
pub mod auth;
pub mod export;
pub mod health;
pub mod media;
pub mod metrics;
pub mod openapi;
pub mod recipients;
pub mod reports;
pub mod users;

pub use activities::configure_activity_routes;
pub use auth::configure_auth_routes;
pub use export::configure_export_routes;
pub use health::configure_health_routes;
pub use media::configure_media_routes;
pub use metrics::configure_metrics_routes;
pub use openapi::ApiDoc;
pub use recipients::configure_recipient_routes;
pub use reports::configure_report_routes;
pub use users::configure_user_routes;
