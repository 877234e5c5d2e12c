//! Lenient parsing of the `Date` column.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-only formats we accept, tried in order. Any format with a leading `%Y` reads "01/05/24"
/// as the year 1, so the month-first formats come before `%Y/%m/%d`, and `%y` comes before `%Y`.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d", "%d %b %Y", "%b %d, %Y", "%B %d, %Y",
];

/// Date-and-time formats we accept, the time portion is discarded.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

/// Parses a cell into a calendar date. Returns `None` when the cell is empty or is not a date we
/// recognize.
pub fn coerce_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }
    if let Some(date_time) = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(date_time.date());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|date_time| date_time.date_naive())
}
