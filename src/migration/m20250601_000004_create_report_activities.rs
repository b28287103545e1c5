//! Migration: Create report_activities table.
//!
//! Quantities are NUMERIC(12,2) and non-negative. Rows are removed by the
//! engine's cascade when the parent report is deleted, in the same
//! transaction.

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
                CREATE TABLE report_activities (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    report_id UUID NOT NULL
                        REFERENCES daily_reports(id) ON DELETE CASCADE,
                    activity_name VARCHAR(100) NOT NULL,
                    unit VARCHAR(20) NOT NULL,
                    target NUMERIC(12,2) NOT NULL DEFAULT 0 CHECK (target >= 0),
                    achieved NUMERIC(12,2) NOT NULL DEFAULT 0 CHECK (achieved >= 0),
                    cumulative NUMERIC(12,2) NOT NULL DEFAULT 0 CHECK (cumulative >= 0),
                    remarks TEXT,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_report_activities_report ON report_activities(report_id);

                -- Aggregation filters on activity name within a report set
                CREATE INDEX idx_report_activities_name ON report_activities(activity_name);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS report_activities CASCADE;")
            .await?;

        Ok(())
    }
}
