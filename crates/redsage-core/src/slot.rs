//! Crunched wall-clock time slots, ready for a payroll timesheet.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::types::{StreamName, ValidationError};
use crate::wall_clock::format_time_of_day;

/// Label used for both ends of an empty day.
pub const EMPTY_LABEL: &str = "-";

/// A worked wall-clock interval within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSlot {
    /// No work recorded that day. Rendered as `- - -`.
    Empty,

    /// Worked from `start` until `end` (`start <= end`).
    Worked { start: NaiveTime, end: NaiveTime },
}

impl TimeSlot {
    pub const fn worked(start: NaiveTime, end: NaiveTime) -> Self {
        Self::Worked { start, end }
    }

    /// Start as `HH:MM`, or `-` for an empty day.
    pub fn start_label(&self) -> String {
        match self {
            Self::Empty => EMPTY_LABEL.to_string(),
            Self::Worked { start, .. } => format_time_of_day(start),
        }
    }

    /// End as `HH:MM`, or `-` for an empty day.
    pub fn end_label(&self) -> String {
        match self {
            Self::Empty => EMPTY_LABEL.to_string(),
            Self::Worked { end, .. } => format_time_of_day(end),
        }
    }

    /// Minutes covered by this slot.
    pub fn worked_minutes(&self) -> i64 {
        match self {
            Self::Empty => 0,
            Self::Worked { start, end } => (*end - *start).num_minutes(),
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start_label(), self.end_label())
    }
}

impl Serialize for TimeSlot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("TimeSlot", 2)?;
        state.serialize_field("start", &self.start_label())?;
        state.serialize_field("end", &self.end_label())?;
        state.end()
    }
}

/// Time slots per date for one stream, in the order they were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DayIntervals(BTreeMap<NaiveDate, Vec<TimeSlot>>);

impl DayIntervals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a slot to a date.
    pub fn put_time_slot(&mut self, date: NaiveDate, slot: TimeSlot) {
        self.0.entry(date).or_default().push(slot);
    }

    /// Slots recorded for a date; empty if the date is unknown.
    pub fn slots(&self, date: NaiveDate) -> &[TimeSlot] {
        self.0.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of dates with at least one slot.
    pub fn days(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, NaiveDate, Vec<TimeSlot>> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a DayIntervals {
    type Item = (&'a NaiveDate, &'a Vec<TimeSlot>);
    type IntoIter = btree_map::Iter<'a, NaiveDate, Vec<TimeSlot>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Crunched time slots per stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CrunchedOutput {
    streams: BTreeMap<StreamName, DayIntervals>,
}

impl CrunchedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slots for `name`, creating an empty entry if missing.
    pub fn add_pipeline(&mut self, name: &str) -> Result<&mut DayIntervals, ValidationError> {
        let name = StreamName::new(name)?;
        Ok(self.streams.entry(name).or_default())
    }

    /// Stores the crunched slots of a stream, replacing any previous entry.
    pub fn insert(&mut self, name: StreamName, intervals: DayIntervals) {
        self.streams.insert(name, intervals);
    }

    /// Looks up a stream by name.
    pub fn pipeline(&self, name: &str) -> Option<&DayIntervals> {
        self.streams.get(name)
    }

    /// Number of streams.
    pub fn entries(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, StreamName, DayIntervals> {
        self.streams.iter()
    }
}

impl<'a> IntoIterator for &'a CrunchedOutput {
    type Item = (&'a StreamName, &'a DayIntervals);
    type IntoIter = btree_map::Iter<'a, StreamName, DayIntervals>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
