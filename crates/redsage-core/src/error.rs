//! Errors raised while turning work durations into time slots.

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::ValidationError;

/// Errors from the wall clock helpers and the crunching engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CrunchError {
    /// A date or time-of-day string could not be parsed.
    #[error("invalid time format: '{value}'")]
    InvalidTimeFormat { value: String },

    /// A work duration was negative or not a number.
    #[error("invalid work duration {hours}h: must be a non-negative number of hours")]
    InvalidDuration { hours: f64 },

    /// The computed slots would end after midnight.
    #[error("{hours}h of work on {date} do not fit into a single day")]
    DayOverflow { date: NaiveDate, hours: f64 },

    /// A core type failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An error tied to a single stream and date.
    #[error("failed to crunch stream '{stream}' on '{date}'")]
    Entry {
        stream: String,
        date: String,
        #[source]
        source: Box<CrunchError>,
    },
}

impl CrunchError {
    /// Attaches the stream and date the error occurred for.
    #[must_use]
    pub fn for_entry(self, stream: impl Into<String>, date: impl Into<String>) -> Self {
        Self::Entry {
            stream: stream.into(),
            date: date.into(),
            source: Box::new(self),
        }
    }
}
