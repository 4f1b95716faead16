//! Date helpers shared by the store, the histogram binner and tooltips.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::error::{SightingError, SightingResult};

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// `YYYY-MM-DD`
pub fn format_date(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM-DD — YYYY-MM-DD`
pub fn format_date_range(earliest: NaiveDateTime, latest: NaiveDateTime) -> String {
    format!("{} — {}", format_date(earliest), format_date(latest))
}

/// Parse an ISO 8601 timestamp without offset, e.g. `2025-05-16T11:43:27.235000`.
///
/// A bare date is accepted and taken as midnight.
pub fn parse_timestamp(s: &str) -> SightingResult<NaiveDateTime> {
    let s = s.trim();

    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(ts);
    }
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(ts.naive_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts);
        }
    }

    Err(SightingError::ParseError(format!("invalid timestamp: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_start_is_monday() {
        // 2025-01-01 was a Wednesday
        let wed = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(week_start(wed), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());

        let mon = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert_eq!(week_start(mon), mon);

        let sun = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        assert_eq!(week_start(sun), mon);
    }

    #[test]
    fn test_format_date_range() {
        let a = parse_timestamp("2025-01-01T08:00:00").unwrap();
        let b = parse_timestamp("2025-01-10T23:59:59").unwrap();
        assert_eq!(format_date_range(a, b), "2025-01-01 — 2025-01-10");
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let ts = parse_timestamp("2025-05-16T11:43:27.235000").unwrap();
        assert_eq!(ts.ordinal(), 136);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }
}
