//! Migration: Create email_recipients table.

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
                CREATE TABLE email_recipients (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    email VARCHAR(255) NOT NULL,
                    role VARCHAR(50),
                    active BOOLEAN NOT NULL DEFAULT TRUE,
                    -- Subscribed report types, e.g. ["daily", "weekly"]
                    report_types JSONB NOT NULL DEFAULT '["daily"]'::jsonb,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE UNIQUE INDEX idx_email_recipients_email ON email_recipients(email);

                CREATE INDEX idx_email_recipients_active ON email_recipients(active)
                    WHERE active = TRUE;
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS email_recipients CASCADE;")
            .await?;

        Ok(())
    }
}
