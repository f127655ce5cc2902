//! Validation helpers for telemetry payloads.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Returns true if `value` parses as an ISO 8601 date or date-time.
///
/// A trailing `Z` is treated as a `+00:00` offset. Full date-times with
/// a numeric offset, date-times without any offset, fractional seconds,
/// and date-only values are all accepted.
pub fn is_valid_timestamp(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }

    let normalized = match value.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => value.to_string(),
    };

    DateTime::parse_from_rfc3339(&normalized).is_ok()
        || normalized.parse::<NaiveDateTime>().is_ok()
        || normalized.parse::<NaiveDate>().is_ok()
}

/// Returns true for the two recognized status values. Case-sensitive.
pub fn is_valid_status(value: &str) -> bool {
    value == "healthy" || value == "critical"
}
