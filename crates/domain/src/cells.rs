//! Persisted cell names and textual formats.
//!
//! The five cells outlive any single event and are the only channel between
//! the cycle tracker and the daily backfill. Adapters store each cell as
//! text; every parse and render of that text goes through this module so the
//! layout is defined exactly once.
//!
//! | cell | format |
//! |---|---|
//! | [`LIFETIME_ENERGY_KWH`] | decimal number |
//! | [`CYCLE_START`] | RFC 3339 timestamp, Unix epoch = no open cycle |
//! | [`DAILY_ACTIVE_SECONDS`] | decimal number |
//! | [`CYCLE_DURATIONS`] | JSON array of decimal seconds |
//! | [`LAST_PROCESSED_DATE`] | `YYYY-MM-DD` or empty |

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::ParseError;
use crate::time::Timestamp;

pub const LIFETIME_ENERGY_KWH: &str = "lifetime_energy_kwh";
pub const CYCLE_START: &str = "cycle_start";
pub const DAILY_ACTIVE_SECONDS: &str = "daily_active_seconds";
pub const CYCLE_DURATIONS: &str = "cycle_durations";
pub const LAST_PROCESSED_DATE: &str = "last_processed_date";

/// All cell names, in the order they are usually displayed.
pub const ALL: [&str; 5] = [
    LIFETIME_ENERGY_KWH,
    CYCLE_START,
    DAILY_ACTIVE_SECONDS,
    CYCLE_DURATIONS,
    LAST_PROCESSED_DATE,
];

/// Parse a decimal cell (lifetime kWh).
///
/// # Errors
///
/// Returns [`ParseError::Number`] when the text is not a finite decimal.
pub fn parse_decimal(text: &str) -> Result<f64, ParseError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::Number(text.to_string()))
}

#[must_use]
pub fn render_decimal(value: f64) -> String {
    value.to_string()
}

/// Parse a whole-second counter cell, rounding fractional values.
///
/// # Errors
///
/// Returns [`ParseError::Number`] when the text is not a finite decimal.
pub fn parse_seconds(text: &str) -> Result<i64, ParseError> {
    parse_decimal(text).map(|value| value.round() as i64)
}

#[must_use]
pub fn render_seconds(value: i64) -> String {
    value.to_string()
}

/// Parse a timestamp cell.
///
/// Accepts RFC 3339 (the form this system writes) and the host's
/// `YYYY-MM-DD HH:MM:SS` form, which is interpreted as UTC.
///
/// # Errors
///
/// Returns [`ParseError::Timestamp`] when neither form matches.
pub fn parse_timestamp(text: &str) -> Result<Timestamp, ParseError> {
    let trimmed = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.to_utc());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| ParseError::Timestamp(text.to_string()))
}

#[must_use]
pub fn render_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339()
}

/// Parse the last-processed-date cell; empty text means "never processed".
///
/// # Errors
///
/// Returns [`ParseError::Date`] for non-empty text that is not `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> Result<Option<NaiveDate>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ParseError::Date(text.to_string()))
}

#[must_use]
pub fn render_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn should_parse_decimal_cell() {
        assert_eq!(parse_decimal("0").unwrap(), 0.0);
        assert_eq!(parse_decimal(" 12.345 ").unwrap(), 12.345);
    }

    #[test]
    fn should_reject_malformed_decimal_cell() {
        for bad in ["", "abc", "NaN", "inf"] {
            assert!(matches!(parse_decimal(bad), Err(ParseError::Number(_))), "{bad:?}");
        }
    }

    #[test]
    fn should_round_fractional_seconds() {
        assert_eq!(parse_seconds("599.6").unwrap(), 600);
        assert_eq!(parse_seconds("600").unwrap(), 600);
    }

    #[test]
    fn should_parse_rfc3339_timestamp() {
        let ts = parse_timestamp("2024-01-01T23:50:00+00:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 23, 50, 0).unwrap());
    }

    #[test]
    fn should_parse_host_style_timestamp_as_utc() {
        let ts = parse_timestamp("2024-01-01 23:50:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 23, 50, 0).unwrap());
    }

    #[test]
    fn should_reject_malformed_timestamp() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(ParseError::Timestamp(_))
        ));
    }

    #[test]
    fn should_roundtrip_timestamp_through_rendered_form() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 2, 6, 30, 0).unwrap();
        assert_eq!(parse_timestamp(&render_timestamp(ts)).unwrap(), ts);
    }

    #[test]
    fn should_treat_empty_date_cell_as_unset() {
        assert_eq!(parse_date("").unwrap(), None);
        assert_eq!(parse_date("   ").unwrap(), None);
    }

    #[test]
    fn should_parse_and_render_date_cell() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_date("2024-03-01").unwrap(), Some(day));
        assert_eq!(render_date(Some(day)), "2024-03-01");
        assert_eq!(render_date(None), "");
    }

    #[test]
    fn should_reject_malformed_date_cell() {
        assert!(matches!(parse_date("03/01/2024"), Err(ParseError::Date(_))));
    }
}
