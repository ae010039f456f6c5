//! # Temporal Types
//!
//! `Timestamp` is a UTC-only instant truncated to seconds, rendered as
//! `YYYY-MM-DDTHH:MM:SSZ`. License expiry is a calendar date (inclusive last
//! valid day) and is compared against the UTC date of the evaluation.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LvsError;

/// Calendar date format used by license records.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string with any offset, converting to UTC.
    pub fn parse(s: &str) -> Result<Self, LvsError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|_| LvsError::InvalidDate {
            input: s.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The UTC calendar date of this instant.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_calendar_date(s: &str) -> Result<NaiveDate, LvsError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| LvsError::InvalidDate {
        input: s.to_string(),
    })
}

/// Whole days from `today` until `expiry`. Negative once expired; zero on
/// the last valid day.
pub fn days_until(today: NaiveDate, expiry: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 45).unwrap();
        let ts = Timestamp::from_utc(dt.with_nanosecond(123_456_789).unwrap());
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:30:45Z");
    }

    #[test]
    fn test_parse_converts_offset() {
        let ts = Timestamp::parse("2026-01-15T17:00:00+05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_date_is_utc_date() {
        let ts = Timestamp::parse("2026-03-01T01:30:00+05:00").unwrap();
        assert_eq!(ts.date(), date(2026, 2, 28));
    }

    #[test]
    fn test_parse_calendar_date() {
        assert_eq!(parse_calendar_date("2025-12-31").unwrap(), date(2025, 12, 31));
        assert_eq!(parse_calendar_date(" 2025-06-30 ").unwrap(), date(2025, 6, 30));
    }

    #[test]
    fn test_parse_calendar_date_rejects_malformed() {
        assert!(parse_calendar_date("31/12/2025").is_err());
        assert!(parse_calendar_date("2025-02-30").is_err());
        assert!(parse_calendar_date("").is_err());
    }

    #[test]
    fn test_days_until() {
        let today = date(2026, 1, 15);
        assert_eq!(days_until(today, today), 0);
        assert_eq!(days_until(today, date(2026, 1, 14)), -1);
        assert_eq!(days_until(today, date(2026, 2, 14)), 30);
        assert_eq!(days_until(date(2024, 2, 28), date(2024, 3, 1)), 2);
    }
}
