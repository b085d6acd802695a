//! # Value Normalization
//!
//! Flattens the optional fields returned by the GitHub API into the plain
//! values stored in resource status. Absent values become the zero value of
//! their type.

use chrono::{DateTime, SecondsFormat, Utc};

/// Returns the string or `""` when absent.
#[must_use]
pub fn string_value(v: Option<&str>) -> String {
    v.map(str::to_owned).unwrap_or_default()
}

/// Returns the integer or `0` when absent.
#[must_use]
pub fn int64_value(v: Option<i64>) -> i64 {
    v.unwrap_or_default()
}

/// Returns the boolean or `false` when absent.
#[must_use]
pub fn bool_value(v: Option<bool>) -> bool {
    v.unwrap_or_default()
}

/// Wraps a string as an optional value, treating `""` as absent.
#[must_use]
pub fn non_empty(v: &str) -> Option<String> {
    if v.is_empty() {
        None
    } else {
        Some(v.to_owned())
    }
}

/// Formats a timestamp as RFC3339 in UTC, or `None` when absent.
#[must_use]
pub fn convert_timestamp(t: Option<&DateTime<Utc>>) -> Option<String> {
    t.map(format_timestamp)
}

/// Formats a timestamp as RFC3339 in UTC with second precision.
#[must_use]
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}
