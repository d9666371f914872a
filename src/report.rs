// src/report.rs
use std::path::Path;

use chrono::Duration;
use serde::Serialize;
use tracing::info;

use crate::attendance::{self, DisplayRow};
use crate::evaluate::{self, Pace, Projection, Summary};
use crate::ingest;
use crate::TallyError;

/// Marker rendered when no working days remain before the checkpoint.
pub const PACE_NOT_COMPUTABLE: &str = "not computable";

/// The structured result record handed to the presentation shell. All hour
/// figures are `H:MM` strings decomposed by floor division on seconds.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HoursReport {
    pub hours_required: String,
    pub hours_worked: String,
    pub days_worked: u32,
    pub average_per_day: String,
    pub goal_met: bool,
    /// Surplus when the goal is met, deficit otherwise; `goal_met` carries
    /// the sign.
    pub extra_or_deficit: String,
    pub checkpoint_date: String,
    pub remaining_working_days: u32,
    /// `H:MM` per remaining working day, or [`PACE_NOT_COMPUTABLE`].
    pub pace_per_day: String,
    pub table: Vec<DisplayRow>,
}

/// Computes the full report for one uploaded time log.
///
/// Pure per invocation: the file is read, materialized, and released;
/// nothing persists across calls. Any parse failure aborts the invocation
/// with no partial result.
pub fn compute(path: &Path) -> Result<HoursReport, TallyError> {
    let rows = ingest::load_rows(path)?;
    let records = attendance::parse_records(&rows)?;
    let summary = evaluate::summarize(&records)?;
    let projection = evaluate::project(&records, &summary)?;
    let report = build_report(&records, &summary, &projection);
    info!(
        "Report ready: worked {} of {} required over {} days",
        report.hours_worked, report.hours_required, report.days_worked
    );
    Ok(report)
}

pub(crate) fn build_report(
    records: &[attendance::AttendanceRecord],
    summary: &Summary,
    projection: &Projection,
) -> HoursReport {
    HoursReport {
        hours_required: format_hm(summary.required),
        hours_worked: format_hm(summary.total_worked),
        days_worked: summary.days_worked,
        average_per_day: format_hm(summary.average_per_day),
        goal_met: summary.goal_met,
        extra_or_deficit: format_hm(summary.difference),
        checkpoint_date: projection.checkpoint.format("%Y-%m-%d").to_string(),
        remaining_working_days: projection.remaining_working_days,
        pace_per_day: match projection.pace {
            Pace::HoursPerDay(per_day) => format_hm(per_day),
            Pace::NotComputable => PACE_NOT_COMPUTABLE.to_string(),
        },
        table: attendance::display_rows(records),
    }
}

/// `H:MM` by floor division on total seconds; truncation, never rounding.
pub fn format_hm(d: Duration) -> String {
    let secs = d.num_seconds();
    format!("{}:{:02}", secs / 3600, secs % 3600 / 60)
}
