//! Automated daily report sender.
//!
//! Sends yesterday's DPR workbook to every active daily recipient and logs
//! each attempt. Intended for a scheduler:
//!
//! ```text
//! 30 10 * * * send-daily-report >> /var/log/dpr_email.log 2>&1
//! ```
//!
//! Pass a date argument (YYYY-MM-DD) to re-send a specific day.
//!
//! Exit codes: 0 all sent, 1 configuration/runtime failure, 2 partial
//! delivery (check the email_logs table).

use chrono::{Duration, NaiveDate, Utc};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use dpr_server_lib::config::Config;
use dpr_server_lib::db::DbPool;
use dpr_server_lib::services::{Mailer, dispatch};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let report_date = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<NaiveDate>() {
            Ok(date) => date,
            Err(_) => {
                error!("Invalid date argument '{}'; expected YYYY-MM-DD", arg);
                std::process::exit(1);
            }
        },
        None => Utc::now().date_naive() - Duration::days(1),
    };

    info!(%report_date, "Starting daily report email service");

    let mailer = match Mailer::new(&config.smtp) {
        Ok(mailer) => mailer,
        Err(e) => {
            error!("SMTP configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let summary =
        match dispatch::send_daily_report(pool.connection(), &mailer, &config.sites, report_date)
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                error!("Dispatch failed: {}", e);
                std::process::exit(1);
            }
        };

    info!(
        recipients = summary.total_recipients,
        sent = summary.sent,
        failed = summary.failed,
        reports = summary.report_count,
        attachment = %summary.attachment_name,
        "Daily report email service finished"
    );

    if summary.failed > 0 {
        warn!("Some emails failed to send; check the email_logs table for details");
        std::process::exit(2);
    }
}
