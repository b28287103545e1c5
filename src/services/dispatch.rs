//! Daily DPR dispatch: aggregate, render, send, log.
//!
//! Runs under the service identity. Each recipient gets its own send
//! attempt and its own email_logs row; one failing address does not stop
//! the rest.

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::db;
use crate::error::AppResult;
use crate::models::email_log::EmailStatus;
use crate::policy::Actor;
use crate::services::{aggregation, excel, mailer};

/// Outcome of one dispatch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSummary {
    pub report_date: NaiveDate,
    pub attachment_name: String,
    pub report_count: usize,
    pub total_recipients: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Send the DPR for `report_date` to every active daily recipient.
///
/// A day with no reports still produces a valid zero workbook; reviewers
/// expect the mail either way.
pub async fn send_daily_report(
    db: &DatabaseConnection,
    mailer: &mailer::Mailer,
    sites: &[String],
    report_date: NaiveDate,
) -> AppResult<DispatchSummary> {
    let actor = Actor::service();

    let recipients = db::recipients::active_recipients_for(db, &actor, "daily").await?;
    if recipients.is_empty() {
        warn!("No active daily recipients; nothing to send");
        return Ok(DispatchSummary {
            report_date,
            attachment_name: excel::dpr_filename(report_date),
            report_count: 0,
            total_recipients: 0,
            sent: 0,
            failed: 0,
        });
    }

    let reports =
        db::reports::fetch_range_with_activities(db, &actor, sites, report_date, report_date)
            .await?;
    let grid = aggregation::aggregate(&reports, sites, report_date, report_date);
    let report_count = grid.report_count();

    let workbook = excel::render_dpr(&grid)?;
    let attachment_name = excel::dpr_filename(report_date);
    let subject = mailer::dpr_subject(report_date);
    let body = mailer::dpr_body_html(report_date, sites, report_count);

    let mut sent = 0;
    let mut failed = 0;

    for recipient in &recipients {
        let result = mailer
            .send_dpr(
                &recipient.email,
                &subject,
                body.clone(),
                &attachment_name,
                workbook.clone(),
            )
            .await;

        let (status, error_message) = match result {
            Ok(()) => {
                sent += 1;
                info!(recipient = %recipient.email, "DPR email sent");
                (EmailStatus::Sent, None)
            }
            Err(e) => {
                failed += 1;
                error!(recipient = %recipient.email, error = %e, "DPR email failed");
                (EmailStatus::Failed, Some(e.to_string()))
            }
        };

        db::email_logs::insert_log(
            db,
            &actor,
            &recipient.email,
            &subject,
            report_date,
            Some(&attachment_name),
            status,
            error_message.as_deref(),
        )
        .await?;
    }

    info!(
        %report_date,
        reports = report_count,
        recipients = recipients.len(),
        sent,
        failed,
        "Daily dispatch finished"
    );

    Ok(DispatchSummary {
        report_date,
        attachment_name,
        report_count,
        total_recipients: recipients.len(),
        sent,
        failed,
    })
}
