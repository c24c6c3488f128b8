//! Time utilities: timestamp storage format, parsing, break duration formatting.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, SecondsFormat, Utc};

/// Storage format for timestamps: RFC 3339, UTC, millisecond precision.
/// Fixed width keeps `ORDER BY` on the TEXT column chronological.
/// Sub-millisecond digits are truncated, so `08:00:00.123456Z` is stored
/// and returned as `08:00:00.123Z`.
pub fn to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn opt_to_db(ts: &Option<DateTime<Utc>>) -> Option<String> {
    ts.as_ref().map(to_db)
}

/// Parse any RFC 3339 timestamp (any offset) into UTC. Full precision is
/// kept here; storage through [`to_db`] truncates to milliseconds.
pub fn parse_ts(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidTimestamp(s.to_string()))
}

/// Format a break duration in minutes, e.g. `1h 05min`.
pub fn format_minutes(mins: i64) -> String {
    let m = mins.max(0);
    format!("{}h {:02}min", m / 60, m % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_normalized_to_utc() {
        let ts = parse_ts("2025-06-02T10:15:00+02:00").unwrap();
        assert_eq!(to_db(&ts), "2025-06-02T08:15:00.000Z");
    }

    #[test]
    fn sub_millisecond_digits_are_truncated_on_storage() {
        let ts = parse_ts("2025-06-02T08:00:00.123456Z").unwrap();
        assert_eq!(to_db(&ts), "2025-06-02T08:00:00.123Z");
        assert_eq!(parse_ts(&to_db(&ts)).unwrap().timestamp_subsec_millis(), 123);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            parse_ts("02/06/2025"),
            Err(AppError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn minutes_are_formatted() {
        assert_eq!(format_minutes(65), "1h 05min");
        assert_eq!(format_minutes(0), "0h 00min");
    }
}
