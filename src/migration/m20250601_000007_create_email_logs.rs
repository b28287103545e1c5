//! Migration: Create email_logs table.
//!
//! recipient_email is intentionally not a foreign key so logs outlive
//! recipient removal.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE email_logs (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    recipient_email VARCHAR(255) NOT NULL,
                    subject VARCHAR(255) NOT NULL,
                    report_date DATE NOT NULL,
                    attachment_name VARCHAR(255),
                    status VARCHAR(20) NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'sent', 'failed')),
                    error_message TEXT,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_email_logs_report_date ON email_logs(report_date);
                CREATE INDEX idx_email_logs_status ON email_logs(status);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS email_logs CASCADE;")
            .await?;

        Ok(())
    }
}
