//! Wall-clock arithmetic.
//!
//! Combines calendar dates with times of day and adds decimal hour counts at
//! minute granularity. Output is only ever shown as `HH:MM`, so fractional
//! minutes are rounded to the nearest whole minute.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::CrunchError;

const TIME_OF_DAY_FORMAT: &str = "%H:%M";
const TIME_OF_DAY_WITH_SECONDS_FORMAT: &str = "%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a 24-hour `HH:MM` or `HH:MM:SS` time of day.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, CrunchError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, TIME_OF_DAY_WITH_SECONDS_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, TIME_OF_DAY_FORMAT))
        .map_err(|_| CrunchError::InvalidTimeFormat {
            value: value.to_string(),
        })
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`, four-digit year).
pub fn parse_date(value: &str) -> Result<NaiveDate, CrunchError> {
    let invalid = || CrunchError::InvalidTimeFormat {
        value: value.to_string(),
    };
    let trimmed = value.trim();
    if !is_iso_date_shape(trimmed) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())
}

/// `DDDD-DD-DD`; chrono alone accepts signed and longer years.
fn is_iso_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// Anchors a textual time of day on the given date.
pub fn combine(date: NaiveDate, time_of_day: &str) -> Result<NaiveDateTime, CrunchError> {
    Ok(date.and_time(parse_time_of_day(time_of_day)?))
}

/// Converts decimal hours into whole minutes, rounding to the nearest minute.
#[expect(
    clippy::cast_possible_truncation,
    reason = "callers reject non-finite input and chrono bounds the result"
)]
pub fn hours_to_minutes(hours: f64) -> i64 {
    (hours * 60.0).round() as i64
}

/// Adds a decimal hour count to an instant.
///
/// `4.5` adds 4h30m. Fails with [`CrunchError::InvalidDuration`] for
/// non-finite values or results outside the representable range.
pub fn add_hours(instant: NaiveDateTime, hours: f64) -> Result<NaiveDateTime, CrunchError> {
    if !hours.is_finite() {
        return Err(CrunchError::InvalidDuration { hours });
    }
    Duration::try_minutes(hours_to_minutes(hours))
        .and_then(|delta| instant.checked_add_signed(delta))
        .ok_or(CrunchError::InvalidDuration { hours })
}

/// Formats the time-of-day part of an instant as `HH:MM`.
pub fn format_time_of_day(instant: &impl Timelike) -> String {
    format!("{:02}:{:02}", instant.hour(), instant.minute())
}

/// Returns true if the minute component is zero.
pub fn is_on_the_hour(instant: NaiveDateTime) -> bool {
    instant.minute() == 0
}

/// Advances an instant to the start of the next hour.
///
/// Instants already on the hour are returned unchanged. Returns `None` past
/// the last representable date.
pub fn round_up_to_next_hour(instant: NaiveDateTime) -> Option<NaiveDateTime> {
    if is_on_the_hour(instant) {
        return Some(instant);
    }
    instant
        .date()
        .and_hms_opt(instant.hour(), 0, 0)?
        .checked_add_signed(Duration::hours(1))
}
