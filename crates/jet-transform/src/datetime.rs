//! Date/time normalization for mapped date columns.
//!
//! Source systems mix pure dates, pure times, and combined timestamps in
//! one column. Output files carry dates as `YYYY-MM-DD` and times as
//! `HH:MM:SS`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%Y%m%d",
    "%d-%b-%Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// A cell split into its date and time parts, either of which may be
/// missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitDateTime {
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Parses a raw cell and splits it into normalized date and time parts.
///
/// Unparseable values yield an empty split rather than an error; the
/// caller passes the original value through untouched in that case.
pub fn split_datetime(value: &str) -> SplitDateTime {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return SplitDateTime::default();
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return SplitDateTime {
                date: Some(dt.date().format("%Y-%m-%d").to_string()),
                time: Some(dt.time().format("%H:%M:%S").to_string()),
            };
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return SplitDateTime {
                date: Some(date.format("%Y-%m-%d").to_string()),
                time: None,
            };
        }
    }
    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, format) {
            return SplitDateTime {
                date: None,
                time: Some(time.format("%H:%M:%S").to_string()),
            };
        }
    }
    SplitDateTime::default()
}

/// Normalizes a date cell to `YYYY-MM-DD`, passing unparseable values
/// through unchanged.
pub fn normalize_date(value: &str) -> String {
    match split_datetime(value).date {
        Some(date) => date,
        None => value.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_combined_timestamp() {
        let split = split_datetime("2024-01-05 10:30");
        assert_eq!(split.date.as_deref(), Some("2024-01-05"));
        assert_eq!(split.time.as_deref(), Some("10:30:00"));
    }

    #[test]
    fn pure_date_has_no_time() {
        let split = split_datetime("15.03.2024");
        assert_eq!(split.date.as_deref(), Some("2024-03-15"));
        assert_eq!(split.time, None);
    }

    #[test]
    fn pure_time_has_no_date() {
        let split = split_datetime("09:15:30");
        assert_eq!(split.date, None);
        assert_eq!(split.time.as_deref(), Some("09:15:30"));
    }

    #[test]
    fn garbage_passes_through_normalize() {
        assert_eq!(normalize_date("not a date"), "not a date");
        assert_eq!(normalize_date("31/12/2023"), "2023-12-31");
    }
}
