//! Pure aggregation of daily reports into the DPR grid.
//!
//! The grid has one row per tracked activity and one three-column block
//! (Target / Achieved / Cumulative) per site. Within a site and activity,
//! target and achieved are summed across the date range while cumulative is
//! the running maximum — cumulative values already carry history, so summing
//! them would double-count.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::reports::ReportWithActivities;
use crate::models::activity::FIXED_ACTIVITIES;

/// One Target/Achieved/Cumulative cell block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCells {
    pub target: Decimal,
    pub achieved: Decimal,
    pub cumulative: Decimal,
}

/// Aggregated figures for one site across the date range.
#[derive(Debug, Clone)]
pub struct SiteAggregate {
    pub site_code: String,
    /// One cell block per entry of [`FIXED_ACTIVITIES`], in catalogue order.
    pub cells: Vec<ActivityCells>,
    /// Column totals: the aggregated cells above, summed.
    pub totals: ActivityCells,
    /// Conditions from the latest report in range, if any.
    pub latest: Option<SiteConditions>,
    pub report_count: usize,
}

/// Weather and workforce snapshot from a site's most recent report.
#[derive(Debug, Clone)]
pub struct SiteConditions {
    pub report_date: NaiveDate,
    pub weather: String,
    pub total_workers: i32,
    pub remarks: Option<String>,
}

/// The full DPR grid for a date range.
#[derive(Debug, Clone)]
pub struct DprAggregate {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub sites: Vec<SiteAggregate>,
}

impl DprAggregate {
    /// Total number of reports that fed the grid.
    pub fn report_count(&self) -> usize {
        self.sites.iter().map(|s| s.report_count).sum()
    }
}

/// Build the DPR grid from fetched reports.
///
/// Sites keep the order of the `sites` argument; a site with no reports in
/// range still gets a column block of zeros. Activities outside the fixed
/// catalogue are ignored.
pub fn aggregate(
    reports: &[ReportWithActivities],
    sites: &[String],
    from: NaiveDate,
    to: NaiveDate,
) -> DprAggregate {
    let site_aggregates = sites
        .iter()
        .map(|site_code| aggregate_site(reports, site_code))
        .collect();

    DprAggregate {
        from,
        to,
        sites: site_aggregates,
    }
}

fn aggregate_site(reports: &[ReportWithActivities], site_code: &str) -> SiteAggregate {
    let site_reports: Vec<&ReportWithActivities> = reports
        .iter()
        .filter(|(r, _)| r.site_code == site_code)
        .collect();

    let mut cells = vec![ActivityCells::default(); FIXED_ACTIVITIES.len()];

    for (idx, (activity_name, _unit)) in FIXED_ACTIVITIES.iter().enumerate() {
        let cell = &mut cells[idx];
        for (_, activities) in &site_reports {
            for activity in activities.iter().filter(|a| a.activity_name == *activity_name) {
                cell.target += activity.target;
                cell.achieved += activity.achieved;
                if activity.cumulative > cell.cumulative {
                    cell.cumulative = activity.cumulative;
                }
            }
        }
    }

    let totals = cells.iter().fold(ActivityCells::default(), |mut acc, c| {
        acc.target += c.target;
        acc.achieved += c.achieved;
        acc.cumulative += c.cumulative;
        acc
    });

    let latest = site_reports
        .iter()
        .max_by_key(|(r, _)| (r.report_date, r.updated_at))
        .map(|(r, _)| SiteConditions {
            report_date: r.report_date,
            weather: r.weather.clone(),
            total_workers: r.total_workers,
            remarks: r.remarks.clone(),
        });

    SiteAggregate {
        site_code: site_code.to_string(),
        cells,
        totals,
        latest,
        report_count: site_reports.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{daily_report, report_activity};
    use chrono::Utc;
    use uuid::Uuid;

    fn report(site: &str, date: &str) -> daily_report::Model {
        daily_report::Model {
            id: Uuid::new_v4(),
            report_date: date.parse().unwrap(),
            site_code: site.to_string(),
            engineer_id: Uuid::new_v4(),
            weather: "Sunny".to_string(),
            total_workers: 40,
            remarks: Some(format!("conditions on {}", date)),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn activity(
        report_id: Uuid,
        name: &str,
        target: i64,
        achieved: i64,
        cumulative: i64,
    ) -> report_activity::Model {
        report_activity::Model {
            id: Uuid::new_v4(),
            report_id,
            activity_name: name.to_string(),
            unit: "Nos".to_string(),
            target: Decimal::from(target),
            achieved: Decimal::from(achieved),
            cumulative: Decimal::from(cumulative),
            remarks: None,
            created_at: Utc::now(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_sums_target_achieved_and_takes_max_cumulative() {
        let r1 = report("TCB-401", "2025-06-01");
        let r2 = report("TCB-401", "2025-06-02");
        let reports = vec![
            (
                r1.clone(),
                vec![activity(r1.id, "Segment Casting", 10, 8, 18)],
            ),
            (
                r2.clone(),
                vec![activity(r2.id, "Segment Casting", 12, 9, 30)],
            ),
        ];

        let grid = aggregate(
            &reports,
            &["TCB-401".to_string()],
            date("2025-06-01"),
            date("2025-06-02"),
        );

        let cell = grid.sites[0].cells[0]; // Segment Casting is first
        assert_eq!(cell.target, Decimal::from(22));
        assert_eq!(cell.achieved, Decimal::from(17));
        assert_eq!(cell.cumulative, Decimal::from(30));
    }

    #[test]
    fn test_empty_input_yields_zero_grid() {
        let grid = aggregate(
            &[],
            &["TCB-401".to_string(), "TCB-402".to_string()],
            date("2025-06-01"),
            date("2025-06-30"),
        );

        assert_eq!(grid.sites.len(), 2);
        for site in &grid.sites {
            assert_eq!(site.cells.len(), FIXED_ACTIVITIES.len());
            assert!(site.cells.iter().all(|c| *c == ActivityCells::default()));
            assert_eq!(site.totals, ActivityCells::default());
            assert!(site.latest.is_none());
            assert_eq!(site.report_count, 0);
        }
        assert_eq!(grid.report_count(), 0);
    }

    #[test]
    fn test_totals_sum_the_aggregated_cells() {
        let r1 = report("TCB-401", "2025-06-01");
        let r2 = report("TCB-401", "2025-06-02");
        let reports = vec![
            (
                r1.clone(),
                vec![
                    activity(r1.id, "Segment Casting", 10, 8, 18),
                    activity(r1.id, "Concrete Work", 5, 5, 100),
                ],
            ),
            (
                r2.clone(),
                vec![activity(r2.id, "Segment Casting", 12, 9, 30)],
            ),
        ];

        let grid = aggregate(
            &reports,
            &["TCB-401".to_string()],
            date("2025-06-01"),
            date("2025-06-02"),
        );

        let totals = grid.sites[0].totals;
        assert_eq!(totals.target, Decimal::from(27));
        assert_eq!(totals.achieved, Decimal::from(22));
        // Totals use the per-activity maxima, not the raw row values.
        assert_eq!(totals.cumulative, Decimal::from(130));
    }

    #[test]
    fn test_reports_land_in_their_own_site_columns() {
        let r1 = report("TCB-401", "2025-06-01");
        let r2 = report("TCB-402", "2025-06-01");
        let reports = vec![
            (r1.clone(), vec![activity(r1.id, "Steel Fixing", 3, 2, 5)]),
            (r2.clone(), vec![activity(r2.id, "Steel Fixing", 7, 6, 9)]),
        ];

        let grid = aggregate(
            &reports,
            &["TCB-401".to_string(), "TCB-402".to_string()],
            date("2025-06-01"),
            date("2025-06-01"),
        );

        let steel = FIXED_ACTIVITIES
            .iter()
            .position(|(n, _)| *n == "Steel Fixing")
            .unwrap();
        assert_eq!(grid.sites[0].cells[steel].target, Decimal::from(3));
        assert_eq!(grid.sites[1].cells[steel].target, Decimal::from(7));
        assert_eq!(grid.report_count(), 2);
    }

    #[test]
    fn test_latest_conditions_come_from_most_recent_report() {
        let mut r1 = report("TCB-401", "2025-06-01");
        r1.weather = "Rainy".to_string();
        let mut r2 = report("TCB-401", "2025-06-03");
        r2.weather = "Sunny".to_string();
        r2.total_workers = 55;
        let reports = vec![(r2.clone(), vec![]), (r1.clone(), vec![])];

        let grid = aggregate(
            &reports,
            &["TCB-401".to_string()],
            date("2025-06-01"),
            date("2025-06-03"),
        );

        let latest = grid.sites[0].latest.as_ref().unwrap();
        assert_eq!(latest.report_date, date("2025-06-03"));
        assert_eq!(latest.weather, "Sunny");
        assert_eq!(latest.total_workers, 55);
    }

    #[test]
    fn test_unknown_activity_names_are_ignored() {
        let r1 = report("TCB-401", "2025-06-01");
        let reports = vec![(
            r1.clone(),
            vec![activity(r1.id, "Tea Break Logistics", 99, 99, 99)],
        )];

        let grid = aggregate(
            &reports,
            &["TCB-401".to_string()],
            date("2025-06-01"),
            date("2025-06-01"),
        );

        assert_eq!(grid.sites[0].totals, ActivityCells::default());
        assert_eq!(grid.sites[0].report_count, 1);
    }
}
