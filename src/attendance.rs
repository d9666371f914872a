// src/attendance.rs
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use serde::Serialize;
use tracing::{debug, warn};

use crate::ingest::RawRow;
use crate::TallyError;

/// Day-first date formats accepted in the `Date` column. A date matching none
/// of these is a row-level defect: it becomes `None` and the row stays in.
const DATE_FORMATS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y", "%d %b %Y"];

/// Clock entries must carry an AM/PM marker, e.g. "9:03AM" or "6:30PM".
const CLOCK_FORMAT: &str = "%I:%M%p";

/// One attended day, derived from a raw sheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub date: Option<NaiveDate>,
    pub clock_in: Option<NaiveTime>,
    pub clock_out: Option<NaiveTime>,
    /// `clock_out - clock_in`. `None` when either side is missing or the
    /// span comes out negative; such rows never contribute to the sum.
    pub worked: Option<Duration>,
}

impl AttendanceRecord {
    /// Weekday name regenerated from the parsed date. The sheet's own
    /// day-name column is dropped at ingestion and never trusted.
    pub fn weekday_name(&self) -> Option<&'static str> {
        self.date.map(|d| match d.weekday() {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        })
    }
}

/// Parses raw rows into attendance records.
///
/// Rows with neither clock entry are non-working days (leave etc.) and are
/// dropped. A clock entry that is present but malformed aborts the whole
/// batch; there is no row-level recovery for time-format errors.
pub fn parse_records(rows: &[RawRow]) -> Result<Vec<AttendanceRecord>, TallyError> {
    let mut records = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let row_no = idx + 2; // 1-based, after the header row
        if row.clock_in.trim().is_empty() && row.clock_out.trim().is_empty() {
            continue;
        }

        let date = parse_date(&row.date);
        if date.is_none() {
            warn!(
                "Row {}: unparseable date {:?}; record kept without a date",
                row_no, row.date
            );
        }

        let clock_in = parse_clock(&row.clock_in, "In", row_no)?;
        let clock_out = parse_clock(&row.clock_out, "Out", row_no)?;
        let worked = match (clock_in, clock_out) {
            (Some(start), Some(end)) => {
                let span = end - start;
                if span < Duration::zero() {
                    warn!(
                        "Row {}: clock-out {} precedes clock-in {}; duration excluded from sum",
                        row_no, end, start
                    );
                    None
                } else {
                    Some(span)
                }
            }
            _ => {
                warn!(
                    "Row {}: only one of In/Out present; worked duration undefined",
                    row_no
                );
                None
            }
        };

        records.push(AttendanceRecord {
            date,
            clock_in,
            clock_out,
            worked,
        });
    }
    debug!(
        "Parsed {} attendance records from {} raw rows",
        records.len(),
        rows.len()
    );
    Ok(records)
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(text, fmt)
            .ok()
            // `%Y` happily matches a two-digit year as e.g. 0024; treat
            // anything before year 1000 as unparseable under that format
            // so `%d/%m/%y` gets its turn and maps 24 to 2024.
            .filter(|parsed| parsed.year() >= 1000)
    })
}

fn parse_clock(
    text: &str,
    column: &'static str,
    row: usize,
) -> Result<Option<NaiveTime>, TallyError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(&text.to_ascii_uppercase(), CLOCK_FORMAT)
        .map(Some)
        .map_err(|_| TallyError::BadClockTime {
            column,
            value: text.to_string(),
            row,
        })
}

// --- Display table ---

/// One row of the human-readable table handed back to the presentation shell.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DisplayRow {
    pub date: String,
    pub weekday: String,
    pub clock_in: String,
    pub clock_out: String,
    pub worked: String,
}

pub fn display_rows(records: &[AttendanceRecord]) -> Vec<DisplayRow> {
    records
        .iter()
        .map(|r| DisplayRow {
            date: r
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            weekday: r.weekday_name().unwrap_or("").to_string(),
            clock_in: r
                .clock_in
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_default(),
            clock_out: r
                .clock_out
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_default(),
            worked: r.worked.map(format_hms).unwrap_or_default(),
        })
        .collect()
}

/// `H:MM:SS` with an unpadded hour and no day component.
pub fn format_hms(d: Duration) -> String {
    let secs = d.num_seconds();
    format!("{}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, clock_in: &str, clock_out: &str) -> RawRow {
        RawRow {
            date: date.to_string(),
            clock_in: clock_in.to_string(),
            clock_out: clock_out.to_string(),
        }
    }

    fn d(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| panic!("Invalid date string format: {}", date_str))
    }

    #[test]
    fn parses_day_first_dates_and_clock_times() {
        let records = parse_records(&[raw("01/07/2024", "9:03AM", "6:30PM")]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, Some(d("2024-07-01")));
        assert_eq!(
            records[0].clock_in,
            NaiveTime::from_hms_opt(9, 3, 0)
        );
        assert_eq!(
            records[0].clock_out,
            NaiveTime::from_hms_opt(18, 30, 0)
        );
        assert_eq!(
            records[0].worked,
            Some(Duration::hours(9) + Duration::minutes(27))
        );
    }

    #[test]
    fn lowercase_meridiem_is_accepted() {
        let records = parse_records(&[raw("01/07/2024", "9:00am", "5:30pm")]).unwrap();
        assert_eq!(records[0].worked, Some(Duration::minutes(8 * 60 + 30)));
    }

    #[test]
    fn two_digit_year_maps_to_the_current_century() {
        let records = parse_records(&[raw("01/07/24", "9:00AM", "5:30PM")]).unwrap();
        assert_eq!(records[0].date, Some(d("2024-07-01")));
    }

    #[test]
    fn sub_millennium_year_text_is_treated_as_unparseable() {
        let records = parse_records(&[raw("01/07/0024", "9:00AM", "5:30PM")]).unwrap();
        assert_eq!(records[0].date, None);
        assert_eq!(records[0].worked, Some(Duration::minutes(8 * 60 + 30)));
    }

    #[test]
    fn rows_with_both_clocks_empty_are_dropped() {
        let records = parse_records(&[
            raw("01/07/2024", "", ""),
            raw("02/07/2024", "9:00AM", "5:30PM"),
        ])
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, Some(d("2024-07-02")));
    }

    #[test]
    fn one_sided_row_is_kept_without_duration() {
        let records = parse_records(&[raw("01/07/2024", "9:00AM", "")]).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].clock_in.is_some());
        assert!(records[0].clock_out.is_none());
        assert_eq!(records[0].worked, None);
    }

    #[test]
    fn malformed_clock_time_aborts_the_batch() {
        let result = parse_records(&[
            raw("01/07/2024", "9:00AM", "5:30PM"),
            raw("02/07/2024", "nine", "5:30PM"),
        ]);
        match result {
            Err(TallyError::BadClockTime { column, value, row }) => {
                assert_eq!(column, "In");
                assert_eq!(value, "nine");
                assert_eq!(row, 3);
            }
            other => panic!("Expected BadClockTime, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_date_becomes_none_but_row_survives() {
        let records = parse_records(&[raw("sometime", "9:00AM", "5:30PM")]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, None);
        assert_eq!(records[0].worked, Some(Duration::minutes(8 * 60 + 30)));
        assert_eq!(records[0].weekday_name(), None);
    }

    #[test]
    fn negative_span_is_excluded_from_duration() {
        let records = parse_records(&[raw("01/07/2024", "6:30PM", "9:03AM")]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].worked, None);
    }

    #[test]
    fn weekday_name_comes_from_the_parsed_date() {
        // 05/07/2024 is a Friday regardless of what the dropped Day column said.
        let records = parse_records(&[raw("05/07/2024", "9:00AM", "5:00PM")]).unwrap();
        assert_eq!(records[0].weekday_name(), Some("Friday"));
    }

    #[test]
    fn display_rows_render_normalized_text() {
        let records = parse_records(&[
            raw("01/07/2024", "9:03AM", "6:30PM"),
            raw("junk", "9:00AM", ""),
        ])
        .unwrap();
        let table = display_rows(&records);
        assert_eq!(
            table[0],
            DisplayRow {
                date: "2024-07-01".to_string(),
                weekday: "Monday".to_string(),
                clock_in: "09:03:00".to_string(),
                clock_out: "18:30:00".to_string(),
                worked: "9:27:00".to_string(),
            }
        );
        // Defective row renders with blanks rather than sentinels.
        assert_eq!(table[1].date, "");
        assert_eq!(table[1].weekday, "");
        assert_eq!(table[1].clock_out, "");
        assert_eq!(table[1].worked, "");
    }

    #[test]
    fn duration_text_has_unpadded_hours() {
        assert_eq!(format_hms(Duration::seconds(8 * 3600 + 27 * 60)), "8:27:00");
        assert_eq!(format_hms(Duration::seconds(0)), "0:00:00");
        assert_eq!(
            format_hms(Duration::seconds(30 * 3600 + 5 * 60 + 9)),
            "30:05:09"
        );
    }
}
