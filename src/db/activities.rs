//! Database operations for individual report activities.
//!
//! Authorization delegates to the parent report's ownership; the join is
//! resolved once per statement by fetching the parent row first.

use sea_orm::*;
use uuid::Uuid;

use crate::entity::daily_report::{self, Entity as Report};
use crate::entity::report_activity::{self, Entity as Activity};
use crate::error::AppResult;
use crate::models::activity::ActivityInput;
use crate::policy::{self, Actor, Operation, Scope};

/// Fetch the owning engineer of a report, if the report exists.
async fn report_owner(db: &DatabaseConnection, report_id: Uuid) -> AppResult<Option<Uuid>> {
    let report = Report::find_by_id(report_id).one(db).await?;
    Ok(report.map(|r| r.engineer_id))
}

/// List activities for a report, scoped by the parent report's read rules.
pub async fn list_by_report(
    db: &DatabaseConnection,
    actor: &Actor,
    report_id: Uuid,
) -> AppResult<Vec<report_activity::Model>> {
    let scope = policy::activities_scope(actor, Operation::Select);
    if scope.is_denied() {
        return Ok(Vec::new());
    }

    let mut select = Activity::find()
        .filter(report_activity::Column::ReportId.eq(report_id));

    if let Scope::Owned(own) = scope {
        // Scope via the parent report's engineer without a second round trip.
        select = select.filter(
            report_activity::Column::ReportId.in_subquery(
                Report::find()
                    .select_only()
                    .column(daily_report::Column::Id)
                    .filter(daily_report::Column::Id.eq(report_id))
                    .filter(daily_report::Column::EngineerId.eq(own))
                    .into_query(),
            ),
        );
    }

    Ok(select
        .order_by_asc(report_activity::Column::ActivityName)
        .all(db)
        .await?)
}

/// Update one activity row. Requires ownership of the parent report.
/// Returns None when the row is missing or out of scope.
pub async fn update_activity(
    db: &DatabaseConnection,
    actor: &Actor,
    activity_id: Uuid,
    input: ActivityInput,
) -> AppResult<Option<report_activity::Model>> {
    let scope = policy::activities_scope(actor, Operation::Update);
    if scope.is_denied() {
        return Ok(None);
    }

    let Some(existing) = Activity::find_by_id(activity_id).one(db).await? else {
        return Ok(None);
    };

    let Some(owner) = report_owner(db, existing.report_id).await? else {
        return Ok(None);
    };
    if !scope.permits_owner(owner) {
        return Ok(None);
    }

    let mut active: report_activity::ActiveModel = existing.into();
    active.activity_name = Set(input.activity_name);
    active.unit = Set(input.unit);
    active.target = Set(input.target);
    active.achieved = Set(input.achieved);
    active.cumulative = Set(input.cumulative);
    active.remarks = Set(input.remarks);

    Ok(Some(active.update(db).await?))
}

/// Delete one activity row. Requires ownership of the parent report.
/// Returns affected rows.
pub async fn delete_activity(
    db: &DatabaseConnection,
    actor: &Actor,
    activity_id: Uuid,
) -> AppResult<u64> {
    let scope = policy::activities_scope(actor, Operation::Delete);
    if scope.is_denied() {
        return Ok(0);
    }

    let Some(existing) = Activity::find_by_id(activity_id).one(db).await? else {
        return Ok(0);
    };

    let Some(owner) = report_owner(db, existing.report_id).await? else {
        return Ok(0);
    };
    if !scope.permits_owner(owner) {
        return Ok(0);
    }

    let result = Activity::delete_by_id(activity_id).exec(db).await?;
    Ok(result.rows_affected)
}
