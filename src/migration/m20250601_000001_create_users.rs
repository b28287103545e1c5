//! Migration: Create users table.
//!
//! Site engineers, project managers, and admins. Authorization is enforced
//! in the application policy layer; `updated_at` is stamped by the write
//! path rather than a trigger.

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
                CREATE TABLE users (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    username VARCHAR(100) NOT NULL,
                    full_name VARCHAR(255) NOT NULL,
                    role VARCHAR(20) NOT NULL
                        CHECK (role IN ('engineer', 'project_manager', 'admin')),
                    site_location VARCHAR(20),
                    password_hash VARCHAR(64),
                    email VARCHAR(255),
                    is_active BOOLEAN NOT NULL DEFAULT TRUE,
                    last_login TIMESTAMPTZ,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE UNIQUE INDEX idx_users_username ON users(username);

                -- Engineer lookup by site (passwordless login flow)
                CREATE INDEX idx_users_site_location ON users(site_location)
                    WHERE site_location IS NOT NULL;

                CREATE INDEX idx_users_role ON users(role);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS users CASCADE;")
            .await?;

        Ok(())
    }
}
