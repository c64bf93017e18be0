//! Time-slot crunching engine.
//!
//! Turns a decimal hour count per date into concrete wall-clock slots,
//! excluding a configured lunch break.
//!
//! # Algorithm Summary
//!
//! 1. Work starts at the configured day start (rounded up to a full hour)
//! 2. A zero-hour day yields the single `Empty` slot
//! 3. A start inside the lunch break moves to the end of the break
//! 4. If the computed end runs past the lunch start, the slot is split at the
//!    lunch start and the remainder resumes after the break
//!
//! Every date is independent; streams and dates are crunched in parallel.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rayon::prelude::*;

use crate::error::CrunchError;
use crate::lunch::LunchWindow;
use crate::observer::{CrunchObserver, NoopObserver};
use crate::pipeline::{PipelineData, WorkPerDay};
use crate::slot::{CrunchedOutput, DayIntervals, TimeSlot};
use crate::types::StreamName;
use crate::wall_clock::{
    add_hours, is_on_the_hour, parse_date, parse_time_of_day, round_up_to_next_hour,
};

/// Default start of the working day.
pub const DEFAULT_DAY_START: &str = "08:00:00";

/// Default start of the lunch break.
pub const DEFAULT_LUNCH_START: &str = "12:00:00";

/// Default lunch break length.
pub const DEFAULT_LUNCH_BREAK_MINUTES: u32 = 60;

/// Configuration for crunching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrunchConfig {
    /// When work starts on every day.
    pub day_start: NaiveTime,

    /// When the lunch break starts.
    pub lunch_start: NaiveTime,

    /// Length of the lunch break.
    pub lunch_break_minutes: u32,
}

impl CrunchConfig {
    /// Builds a configuration from `HH:MM[:SS]` strings.
    pub fn new(
        day_start: &str,
        lunch_start: &str,
        lunch_break_minutes: u32,
    ) -> Result<Self, CrunchError> {
        Ok(Self {
            day_start: parse_time_of_day(day_start)?,
            lunch_start: parse_time_of_day(lunch_start)?,
            lunch_break_minutes,
        })
    }

    pub const fn lunch_window(&self) -> LunchWindow {
        LunchWindow::new(self.lunch_start, self.lunch_break_minutes)
    }
}

impl Default for CrunchConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_DAY_START,
            DEFAULT_LUNCH_START,
            DEFAULT_LUNCH_BREAK_MINUTES,
        )
        .expect("default times are valid")
    }
}

/// Converts work durations into time slots.
pub struct Cruncher {
    config: CrunchConfig,
    observer: Box<dyn CrunchObserver>,
}

impl Cruncher {
    /// Creates a cruncher that reports to nobody.
    pub fn new(config: CrunchConfig) -> Self {
        Self {
            config,
            observer: Box::new(NoopObserver),
        }
    }

    /// Replaces the observer notified while crunching.
    #[must_use]
    pub fn with_observer(mut self, observer: impl CrunchObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Crunches every stream of `data`.
    ///
    /// The first failing entry aborts the whole run; its error names the
    /// stream and date.
    pub fn crunch(&self, data: &PipelineData) -> Result<CrunchedOutput, CrunchError> {
        let crunched = data
            .as_map()
            .par_iter()
            .map(|(stream, work)| {
                self.crunch_pipeline(stream, work)
                    .map(|intervals| (stream.clone(), intervals))
            })
            .collect::<Result<Vec<_>, CrunchError>>()?;

        let mut output = CrunchedOutput::new();
        for (stream, intervals) in crunched {
            output.insert(stream, intervals);
        }
        Ok(output)
    }

    /// Crunches all dates of a single stream.
    pub fn crunch_pipeline(
        &self,
        stream: &StreamName,
        work: &WorkPerDay,
    ) -> Result<DayIntervals, CrunchError> {
        self.observer.pipeline_started(stream, work.days());

        let days = work
            .as_map()
            .par_iter()
            .map(|(raw_date, &hours)| {
                self.crunch_entry(stream, raw_date, hours)
                    .map_err(|err| err.for_entry(stream.as_str(), raw_date.as_str()))
            })
            .collect::<Result<Vec<_>, CrunchError>>()?;

        let mut intervals = DayIntervals::new();
        for (date, slots) in days {
            for slot in slots {
                intervals.put_time_slot(date, slot);
            }
        }
        Ok(intervals)
    }

    fn crunch_entry(
        &self,
        stream: &StreamName,
        raw_date: &str,
        hours: f64,
    ) -> Result<(NaiveDate, Vec<TimeSlot>), CrunchError> {
        let date = parse_date(raw_date)?;
        let slots = self.crunch_day(date, hours)?;
        self.observer.day_crunched(stream, date, hours, &slots);
        Ok((date, slots))
    }

    /// Crunches one date into one or two slots.
    ///
    /// Zero hours yield the `Empty` slot. Otherwise work starts at the
    /// configured day start; if it would run past the lunch start it is
    /// split there and resumes after the break, keeping the worked total.
    /// Work starting inside the break begins once the break is over.
    pub fn crunch_day(&self, date: NaiveDate, hours: f64) -> Result<Vec<TimeSlot>, CrunchError> {
        if !hours.is_finite() || hours < 0.0 {
            return Err(CrunchError::InvalidDuration { hours });
        }
        if hours == 0.0 {
            return Ok(vec![TimeSlot::Empty]);
        }
        let overflow = || CrunchError::DayOverflow { date, hours };

        let mut start = date.and_time(self.config.day_start);
        // Only reachable with a day start that is not hour-aligned.
        if !is_on_the_hour(start) {
            start = round_up_to_next_hour(start).ok_or_else(overflow)?;
        }

        let lunch = self.config.lunch_window();
        let lunch_end = lunch.ends_at(date).ok_or_else(overflow)?;
        if start >= lunch.starts_at(date) && start < lunch_end {
            start = lunch_end;
        }

        // Hours are finite here, so a failed addition can only overflow.
        let end = add_hours(start, hours).map_err(|_| overflow())?;
        let (diff, overlaps) = lunch.overlap(end, date);

        if !overlaps || start >= lunch_end {
            return Ok(vec![day_slot(date, hours, start, end)?]);
        }

        let end_before_lunch = end.checked_sub_signed(diff).ok_or_else(overflow)?;
        let start_after_lunch = end_before_lunch
            .checked_add_signed(lunch.break_duration())
            .ok_or_else(overflow)?;
        let end_after_lunch = start_after_lunch
            .checked_add_signed(diff)
            .ok_or_else(overflow)?;

        Ok(vec![
            day_slot(date, hours, start, end_before_lunch)?,
            day_slot(date, hours, start_after_lunch, end_after_lunch)?,
        ])
    }
}

/// Builds a slot, rejecting instants that left the calendar day.
fn day_slot(
    date: NaiveDate,
    hours: f64,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<TimeSlot, CrunchError> {
    if start.date() != date || end.date() != date {
        return Err(CrunchError::DayOverflow { date, hours });
    }
    Ok(TimeSlot::worked(start.time(), end.time()))
}
