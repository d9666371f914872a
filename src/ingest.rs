// src/ingest.rs
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{debug, info};

use crate::TallyError;

/// Columns the sheet must carry. Only the first three feed the calculation;
/// the remaining four are structurally dropped right after the header check.
pub const REQUIRED_COLUMNS: [&str; 7] =
    ["Date", "In", "Out", "Day", "Requested", "Deduction", "Request"];

/// One ingested row, reduced to the columns the record parser consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub date: String,
    pub clock_in: String,
    pub clock_out: String,
}

/// Reads a time log into raw rows, dispatching on the file extension.
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>, TallyError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    info!("Loading time log from {} ({})", path.display(), ext);
    match ext.as_str() {
        "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => rows_from_grid(read_workbook(path)?),
        "csv" => rows_from_grid(read_csv(path)?),
        other => Err(TallyError::UnsupportedFormat(other.to_string())),
    }
}

/// Turns a header-plus-data grid into raw rows. All required columns must be
/// present in the header row, extra columns are ignored.
pub fn rows_from_grid(grid: Vec<Vec<String>>) -> Result<Vec<RawRow>, TallyError> {
    let header = grid.first().ok_or(TallyError::EmptySheet)?;
    for name in REQUIRED_COLUMNS {
        column_index(header, name)?;
    }
    let date_col = column_index(header, "Date")?;
    let in_col = column_index(header, "In")?;
    let out_col = column_index(header, "Out")?;

    let cell = |row: &[String], idx: usize| row.get(idx).cloned().unwrap_or_default();
    let rows: Vec<RawRow> = grid[1..]
        .iter()
        .map(|row| RawRow {
            date: cell(row, date_col),
            clock_in: cell(row, in_col),
            clock_out: cell(row, out_col),
        })
        .collect();
    debug!("Ingested {} data rows", rows.len());
    Ok(rows)
}

fn column_index(header: &[String], name: &'static str) -> Result<usize, TallyError> {
    header
        .iter()
        .position(|h| h.trim() == name)
        .ok_or(TallyError::MissingColumn(name))
}

fn read_workbook(path: &Path) -> Result<Vec<Vec<String>>, TallyError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(TallyError::NoSheet)??;
    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

/// Renders a workbook cell as the free text the record parser expects.
/// Excel-native date/time cells are normalized to the same day-first and
/// 12-hour conventions a textual log uses.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            // A whole-number serial is a calendar date. Any nonzero fraction
            // is a clock reading, whether Excel stored it bare (serial below
            // 1.0) or stamped onto a date on entry.
            Some(ndt) if dt.as_f64().fract() == 0.0 && dt.as_f64() >= 1.0 => {
                ndt.format("%d/%m/%Y").to_string()
            }
            Some(ndt) => ndt.format("%-I:%M%p").to_string(),
            None => String::new(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
    }
}

fn read_csv(path: &Path) -> Result<Vec<Vec<String>>, TallyError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(|c| c.trim().to_string()).collect());
    }
    Ok(grid)
}
