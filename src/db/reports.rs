//! Database operations for daily reports.

use chrono::{NaiveDate, Utc};
use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::entity::daily_report::{self, Entity as Report};
use crate::entity::report_activity::{self, Entity as Activity};
use crate::error::{AppError, AppResult};
use crate::models::report::{ListReportsQuery, SaveReportRequest};
use crate::policy::{self, Actor, Operation, Scope};

use super::stamp;

/// A report together with its activity rows.
pub type ReportWithActivities = (daily_report::Model, Vec<report_activity::Model>);

/// Idempotent save for one (report_date, site_code) report.
///
/// Inserts a new report, or — when the actor already owns the report for
/// that site and date — updates it and replaces its activities. Activities
/// with no quantities are dropped. Runs in one transaction.
pub async fn save_report(
    db: &DatabaseConnection,
    actor: &Actor,
    req: SaveReportRequest,
) -> AppResult<ReportWithActivities> {
    let insert_scope = policy::reports_scope(actor, Operation::Insert);
    if insert_scope.is_denied() {
        return Err(AppError::Unauthorized(
            "Only site engineers may submit reports".to_string(),
        ));
    }

    let txn = db.begin().await?;

    let existing = Report::find()
        .filter(daily_report::Column::ReportDate.eq(req.report_date))
        .filter(daily_report::Column::SiteCode.eq(req.site_code.clone()))
        .one(&txn)
        .await?;

    let report = match existing {
        Some(found) => {
            // Update path requires ownership of the existing row; a foreign
            // report surfaces as the same conflict the unique index would
            // raise on insert.
            let update_scope = policy::reports_scope(actor, Operation::Update);
            if !update_scope.permits_owner(found.engineer_id) {
                return Err(AppError::Conflict(
                    "A report for this site and date already exists".to_string(),
                ));
            }

            let report_id = found.id;
            let previous_updated_at = found.updated_at;
            let mut active: daily_report::ActiveModel = found.into();
            active.weather = Set(req.weather.clone());
            active.total_workers = Set(req.total_workers);
            active.remarks = Set(req.remarks.clone());
            active.updated_at = Set(stamp::touch(previous_updated_at));
            let updated = active.update(&txn).await?;

            // Replace activities wholesale; the submission carries the full set.
            Activity::delete_many()
                .filter(report_activity::Column::ReportId.eq(report_id))
                .exec(&txn)
                .await?;

            updated
        }
        None => {
            let now = Utc::now();
            let model = daily_report::ActiveModel {
                id: Set(Uuid::new_v4()),
                report_date: Set(req.report_date),
                site_code: Set(req.site_code.clone()),
                engineer_id: Set(actor.id),
                weather: Set(req.weather.clone()),
                total_workers: Set(req.total_workers),
                remarks: Set(req.remarks.clone()),
                created_at: Set(now),
                updated_at: Set(now),
            };
            model.insert(&txn).await?
        }
    };

    let now = Utc::now();
    let rows: Vec<report_activity::ActiveModel> = req
        .activities
        .iter()
        .filter(|a| a.has_data())
        .map(|a| report_activity::ActiveModel {
            id: Set(Uuid::new_v4()),
            report_id: Set(report.id),
            activity_name: Set(a.activity_name.clone()),
            unit: Set(a.unit.clone()),
            target: Set(a.target),
            achieved: Set(a.achieved),
            cumulative: Set(a.cumulative),
            remarks: Set(a.remarks.clone()),
            created_at: Set(now),
        })
        .collect();

    if !rows.is_empty() {
        Activity::insert_many(rows).exec(&txn).await?;
    }

    let activities = Activity::find()
        .filter(report_activity::Column::ReportId.eq(report.id))
        .all(&txn)
        .await?;

    txn.commit().await?;

    Ok((report, activities))
}

/// List reports visible to the actor with optional site/date filters.
pub async fn list_reports(
    db: &DatabaseConnection,
    actor: &Actor,
    query: &ListReportsQuery,
) -> AppResult<(Vec<daily_report::Model>, u64)> {
    let mut select = Report::find();

    match policy::reports_scope(actor, Operation::Select) {
        Scope::All => {}
        Scope::Owned(id) => select = select.filter(daily_report::Column::EngineerId.eq(id)),
        Scope::Denied => return Ok((Vec::new(), 0)),
    }

    if let Some(ref site) = query.site {
        select = select.filter(daily_report::Column::SiteCode.eq(site.clone()));
    }
    if let Some(from) = query.from {
        select = select.filter(daily_report::Column::ReportDate.gte(from));
    }
    if let Some(to) = query.to {
        select = select.filter(daily_report::Column::ReportDate.lte(to));
    }

    let total = select.clone().count(db).await?;

    let limit = query.limit.clamp(1, 1000) as u64;
    let offset = query.offset.clamp(0, i64::MAX) as u64;

    let reports = select
        .order_by_desc(daily_report::Column::ReportDate)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;

    Ok((reports, total))
}

/// Get a report with its activities, policy-scoped. Out-of-scope rows are
/// indistinguishable from missing ones.
pub async fn get_report_with_activities(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
) -> AppResult<Option<ReportWithActivities>> {
    let mut select = Report::find_by_id(id);

    match policy::reports_scope(actor, Operation::Select) {
        Scope::All => {}
        Scope::Owned(own) => select = select.filter(daily_report::Column::EngineerId.eq(own)),
        Scope::Denied => return Ok(None),
    }

    let Some(report) = select.one(db).await? else {
        return Ok(None);
    };

    let activities = Activity::find()
        .filter(report_activity::Column::ReportId.eq(report.id))
        .all(db)
        .await?;

    Ok(Some((report, activities)))
}

/// Delete a report. Admin only; activities and media cascade in the same
/// transaction via the engine's foreign keys. Returns affected rows.
pub async fn delete_report(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> AppResult<u64> {
    let mut delete = Report::delete_many().filter(daily_report::Column::Id.eq(id));

    match policy::reports_scope(actor, Operation::Delete) {
        Scope::All => {}
        Scope::Owned(own) => {
            delete = delete.filter(daily_report::Column::EngineerId.eq(own));
        }
        Scope::Denied => return Ok(0),
    }

    let result = delete.exec(db).await?;
    Ok(result.rows_affected)
}

/// Fetch all reports with activities for the given sites and inclusive date
/// range, policy-scoped. Used by the export and metrics paths.
pub async fn fetch_range_with_activities(
    db: &DatabaseConnection,
    actor: &Actor,
    sites: &[String],
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<ReportWithActivities>> {
    let mut select = Report::find()
        .filter(daily_report::Column::SiteCode.is_in(sites.iter().cloned()))
        .filter(daily_report::Column::ReportDate.gte(from))
        .filter(daily_report::Column::ReportDate.lte(to));

    match policy::reports_scope(actor, Operation::Select) {
        Scope::All => {}
        Scope::Owned(id) => select = select.filter(daily_report::Column::EngineerId.eq(id)),
        Scope::Denied => return Ok(Vec::new()),
    }

    let reports = select
        .order_by_asc(daily_report::Column::ReportDate)
        .all(db)
        .await?;

    if reports.is_empty() {
        return Ok(Vec::new());
    }

    let report_ids: Vec<Uuid> = reports.iter().map(|r| r.id).collect();
    let activities = Activity::find()
        .filter(report_activity::Column::ReportId.is_in(report_ids))
        .all(db)
        .await?;

    let mut by_report: HashMap<Uuid, Vec<report_activity::Model>> = HashMap::new();
    for activity in activities {
        by_report.entry(activity.report_id).or_default().push(activity);
    }

    Ok(reports
        .into_iter()
        .map(|r| {
            let acts = by_report.remove(&r.id).unwrap_or_default();
            (r, acts)
        })
        .collect())
}
