//! SeaORM entity definitions for PostgreSQL database.

pub mod daily_report;
pub mod email_log;
pub mod email_recipient;
pub mod media_file;
pub mod report_activity;
pub mod user;
pub mod user_session;
