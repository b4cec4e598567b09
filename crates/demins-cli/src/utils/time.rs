//! Conversions between wall-clock instants and the date strings found in
//! vessel files and on the command line. All times are UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::time::SystemTime;
use thiserror::Error;

/// Accepted layouts for a date and time without an offset.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// The same layouts followed by a `±HH:MM` offset.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("Invalid timestamp '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid timestamp '{0}': dates before 1970 are not supported")]
    BeforeEpoch(String),
}

/// Parses RFC 3339 (`2024-01-15T08:30:00Z`, `2024-01-15 08:30:00.5-05:00`),
/// the same without seconds, or a bare `YYYY-MM-DD`. Input without an offset
/// is read as UTC.
pub fn parse_timestamp(input: &str) -> Result<SystemTime, TimestampError> {
    let s = input.trim();
    let parsed = parse_utc(s).map_err(|source| TimestampError::Parse {
        input: input.to_string(),
        source,
    })?;
    if parsed.timestamp() < 0 {
        return Err(TimestampError::BeforeEpoch(input.to_string()));
    }
    Ok(SystemTime::from(parsed))
}

fn parse_utc(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let rfc3339 = match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(e) => e,
    };
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    let naive = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Ok(dt.and_utc());
        }
    }
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => Ok(date.and_time(NaiveTime::MIN).and_utc()),
        Err(_) => Err(rfc3339),
    }
}

/// Formats an instant as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}
