//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_user_sessions;
mod m20250601_000003_create_daily_reports;
mod m20250601_000004_create_report_activities;
mod m20250601_000005_create_media_files;
mod m20250601_000006_create_email_recipients;
mod m20250601_000007_create_email_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_user_sessions::Migration),
            Box::new(m20250601_000003_create_daily_reports::Migration),
            Box::new(m20250601_000004_create_report_activities::Migration),
            Box::new(m20250601_000005_create_media_files::Migration),
            Box::new(m20250601_000006_create_email_recipients::Migration),
            Box::new(m20250601_000007_create_email_logs::Migration),
        ]
    }
}
