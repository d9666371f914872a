// src/evaluate.rs
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::{debug, info};

use crate::attendance::AttendanceRecord;
use crate::TallyError;

/// Company policy: 8.5 hours expected per attended day.
pub const REQUIRED_MINUTES_PER_DAY: i64 = 8 * 60 + 30;

/// Rest days excluded when counting working days up to the checkpoint.
pub const REST_WEEKDAYS: [Weekday; 2] = [Weekday::Fri, Weekday::Sat];

/// Day of month the pacing deadline falls on.
pub const CHECKPOINT_DAY: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_worked: Duration,
    pub days_worked: u32,
    pub required: Duration,
    pub average_per_day: Duration,
    /// Worked at least the required total (non-strict).
    pub goal_met: bool,
    /// `|total_worked - required|`; surplus or deficit per `goal_met`.
    pub difference: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pace {
    HoursPerDay(Duration),
    /// No working days remain before the checkpoint; a per-day figure
    /// would be a division by zero.
    NotComputable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub last_attendance: NaiveDate,
    pub checkpoint: NaiveDate,
    pub remaining_working_days: u32,
    pub pace: Pace,
}

/// Aggregates the record set into totals against the hour policy.
///
/// Every kept record counts as an attended day, including rows whose worked
/// duration is undefined; those contribute zero to the sum. Rows without a
/// parseable date also count here: the duration math never needs the date
/// (see DESIGN.md for the policy decision).
pub fn summarize(records: &[AttendanceRecord]) -> Result<Summary, TallyError> {
    if records.is_empty() {
        return Err(TallyError::EmptySheet);
    }
    let total_worked = records
        .iter()
        .filter_map(|r| r.worked)
        .fold(Duration::zero(), |acc, d| acc + d);
    let days_worked = records.len() as u32;
    let required = Duration::minutes(days_worked as i64 * REQUIRED_MINUTES_PER_DAY);
    let average_per_day = Duration::seconds(total_worked.num_seconds() / days_worked as i64);
    let goal_met = total_worked >= required;
    let difference = if goal_met {
        total_worked - required
    } else {
        required - total_worked
    };
    info!(
        "Summary: {} days, worked {}s, required {}s, goal met: {}",
        days_worked,
        total_worked.num_seconds(),
        required.num_seconds(),
        goal_met
    );
    Ok(Summary {
        total_worked,
        days_worked,
        required,
        average_per_day,
        goal_met,
        difference,
    })
}

/// The 15th of the month of `last` when `last` falls on or before the 15th,
/// otherwise the 15th of the following month (December rolls into January).
pub fn checkpoint_for(last: NaiveDate) -> NaiveDate {
    if last.day() <= CHECKPOINT_DAY {
        last.with_day(CHECKPOINT_DAY).expect("every month has a 15th")
    } else {
        let (year, month) = if last.month() == 12 {
            (last.year() + 1, 1)
        } else {
            (last.year(), last.month() + 1)
        };
        NaiveDate::from_ymd_opt(year, month, CHECKPOINT_DAY).expect("every month has a 15th")
    }
}

/// Counts the calendar days in `(after, upto]` that are not rest weekdays.
pub fn working_days_between(after: NaiveDate, upto: NaiveDate) -> u32 {
    after
        .iter_days()
        .skip(1)
        .take_while(|day| *day <= upto)
        .filter(|day| !REST_WEEKDAYS.contains(&day.weekday()))
        .count() as u32
}

/// Projects the pace needed (or available as slack) by the next checkpoint.
pub fn project(
    records: &[AttendanceRecord],
    summary: &Summary,
) -> Result<Projection, TallyError> {
    let last_attendance = records
        .iter()
        .filter_map(|r| r.date)
        .max()
        .ok_or(TallyError::NoUsableDates)?;
    let checkpoint = checkpoint_for(last_attendance);
    let remaining_working_days = working_days_between(last_attendance, checkpoint);
    let pace = if remaining_working_days == 0 {
        Pace::NotComputable
    } else {
        Pace::HoursPerDay(Duration::seconds(
            summary.difference.num_seconds() / remaining_working_days as i64,
        ))
    };
    debug!(
        "Projection: last attendance {}, checkpoint {}, {} working days remain",
        last_attendance, checkpoint, remaining_working_days
    );
    Ok(Projection {
        last_attendance,
        checkpoint,
        remaining_working_days,
        pace,
    })
}
