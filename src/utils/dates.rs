//! Date handling for vendor timestamps. Timestamps without an offset are
//! taken as UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::utils::error::{RatesError, Result};

static TIME_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"T\d\d:\d\d:\d\dZ").expect("static pattern"));

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]`, or a bare date.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `2024-01-01` becomes `2024-01-01T00:00:00.000Z`.
pub fn to_request_timestamp(field: &str, value: &str) -> Result<String> {
    parse_datetime(value)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| RatesError::ValidationError {
            message: format!("{} is not a valid date: '{}'", field, value),
        })
}

pub fn epoch_millis(value: &str) -> Option<i64> {
    parse_datetime(value).map(|dt| dt.timestamp_millis())
}

/// Year-month-day without zero padding, e.g. `2024-1-5`.
pub fn unpadded_date(value: &str) -> Option<String> {
    parse_datetime(value).map(|dt| format!("{}-{}-{}", dt.year(), dt.month(), dt.day()))
}

/// Drops a `Thh:mm:ssZ` time part, leaving other shapes untouched.
pub fn strip_time_suffix(value: &str) -> String {
    TIME_SUFFIX.replace(value, "").into_owned()
}
