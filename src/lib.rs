// src/lib.rs
use thiserror::Error;

pub mod attendance;
pub mod evaluate;
pub mod ingest;
pub mod report;


pub use report::{compute, HoursReport};

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("Unsupported input format: {0:?}")]
    UnsupportedFormat(String),
    #[error("Workbook has no readable sheet")]
    NoSheet,
    #[error("Unparseable clock time {value:?} in column '{column}' (row {row})")]
    BadClockTime {
        column: &'static str,
        value: String,
        row: usize,
    },
    #[error("Sheet contains no attendance rows")]
    EmptySheet,
    #[error("No row carries a parseable date")]
    NoUsableDates,
    #[error("Spreadsheet error: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}
