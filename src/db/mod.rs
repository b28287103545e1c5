//! Database module providing connection management and policy-scoped queries.
//!
//! Every query function takes the acting identity resolved once per request
//! and asks [`crate::policy`] for a row scope before building the statement.
//! Denied reads return empty results; denied writes affect zero rows.

pub mod activities;
pub mod email_logs;
pub mod media;
pub mod recipients;
pub mod reports;
pub mod sessions;
pub mod stamp;
pub mod users;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Database connection pool wrapper around SeaORM's PostgreSQL pool.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Connect to PostgreSQL.
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let mut options = ConnectOptions::new(database_url.to_string());
        options
            .max_connections(20)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        Ok(DbPool { conn })
    }

    /// Get the underlying connection for executing queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Round-trip a trivial query, for readiness probes.
    pub async fn ping(&self) -> AppResult<()> {
        let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
        self.conn
            .query_one_raw(stmt)
            .await
            .map_err(|e| AppError::Database(format!("Database ping failed: {}", e)))?;
        Ok(())
    }
}
