//! Migration: Create daily_reports table.
//!
//! The unique (report_date, site_code) index is the at-most-one-report-per-
//! site-per-day invariant; concurrent duplicate inserts are rejected
//! atomically by the engine.

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
                CREATE TABLE daily_reports (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    report_date DATE NOT NULL,
                    site_code VARCHAR(20) NOT NULL,
                    engineer_id UUID NOT NULL REFERENCES users(id),
                    weather VARCHAR(50) NOT NULL,
                    total_workers INTEGER NOT NULL DEFAULT 0
                        CHECK (total_workers >= 0),
                    remarks TEXT,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- One report per site per day
                CREATE UNIQUE INDEX idx_daily_reports_date_site
                    ON daily_reports(report_date, site_code);

                CREATE INDEX idx_daily_reports_engineer ON daily_reports(engineer_id);

                -- Export and listing queries filter by site then date range
                CREATE INDEX idx_daily_reports_site_date
                    ON daily_reports(site_code, report_date DESC);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS daily_reports CASCADE;")
            .await?;

        Ok(())
    }
}
