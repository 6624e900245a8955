//! Time and calendar helpers.
//!
//! All timestamps are UTC and all calendar days are UTC days; events carry
//! their own timestamp so no domain logic ever reads the wall clock.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// UTC timestamp used for cycle boundaries and event times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// The calendar day a timestamp falls on.
#[must_use]
pub fn day_of(ts: Timestamp) -> NaiveDate {
    ts.date_naive()
}

/// The first instant of the day after the one `ts` falls on.
///
/// This is the boundary a cycle is split at when it crosses midnight.
#[must_use]
pub fn midnight_after(ts: Timestamp) -> Timestamp {
    let midnight = ts.date_naive().and_time(NaiveTime::MIN).and_utc();
    midnight + chrono::Duration::days(1)
}

/// The calendar day before `day`.
///
/// Saturates at the minimum representable date, which no real clock reaches.
#[must_use]
pub fn previous_day(day: NaiveDate) -> NaiveDate {
    day.pred_opt().unwrap_or(NaiveDate::MIN)
}
