use crate::error::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 5] = [
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%d-%m-%Y", "%Y-%m-%d"];

/// Parse a `last_update` cell into a naive timestamp
///
/// The Indian open-data feeds publish `DD-MM-YYYY HH:MM:SS`; ISO layouts,
/// RFC 3339 and bare dates (taken as midnight) are accepted too.
///
/// # Examples
/// ```
/// use aqi_processor::utils::parse_timestamp;
///
/// let ts = parse_timestamp("21-02-2025 10:00:00").unwrap();
/// assert_eq!(ts.to_string(), "2025-02-21 10:00:00");
/// ```
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.naive_utc());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            if let Some(ts) = date.and_hms_opt(0, 0, 0) {
                return Ok(ts);
            }
        }
    }

    // Nothing matched; report chrono's error for the feed layout
    Ok(NaiveDateTime::parse_from_str(text, DATETIME_FORMATS[0])?)
}
