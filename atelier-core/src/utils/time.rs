//! Time helpers
//!
//! Dates cross the boundary as `YYYY-MM-DD` strings and are rendered
//! `dd/MM/yyyy` in exports. Timestamps are Unix millis.

use chrono::{NaiveDate, NaiveTime, Utc};
use shared::CoreError;

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| CoreError::validation(format!("Invalid date format: {date}")))
}

/// Parse a time string (HH:MM)
pub fn parse_time(time: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| CoreError::validation(format!("Invalid time format: {time}")))
}

/// Render a date the way exports and receipts print it (dd/MM/yyyy)
pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Render a date for filenames (dd-MM-yyyy)
pub fn format_date_filename(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Current Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Today's date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
