//! Daily work durations per stream, as read from a time-tracking export.
//!
//! Hours are decimal: `0.5` means 30 minutes.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::types::{StreamName, ValidationError};

/// Accumulated hours per date string, e.g. `2021-05-05 -> 5.75`.
///
/// Dates are kept as they appear in the source; the crunching engine
/// validates them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkPerDay(BTreeMap<String, f64>);

impl WorkPerDay {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds hours to a date, summing with anything already recorded.
    pub fn put_work_time(&mut self, date: impl Into<String>, hours: f64) {
        *self.0.entry(date.into()).or_insert(0.0) += hours;
    }

    /// Hours recorded for a date, 0 if none.
    pub fn work_time(&self, date: &str) -> f64 {
        self.0.get(date).copied().unwrap_or(0.0)
    }

    /// Number of dates with a recorded value.
    pub fn days(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, f64> {
        self.0.iter()
    }

    pub(crate) const fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.0
    }
}

impl<'a> IntoIterator for &'a WorkPerDay {
    type Item = (&'a String, &'a f64);
    type IntoIter = btree_map::Iter<'a, String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Work durations for all streams of an export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipelineData {
    streams: BTreeMap<StreamName, WorkPerDay>,
}

impl PipelineData {
    /// Creates an empty data set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `name`, creating it if missing.
    pub fn add_pipeline(&mut self, name: &str) -> Result<&mut WorkPerDay, ValidationError> {
        let name = StreamName::new(name)?;
        Ok(self.streams.entry(name).or_default())
    }

    /// Returns the entry for an already validated name, creating it if missing.
    pub fn pipeline_mut(&mut self, name: StreamName) -> &mut WorkPerDay {
        self.streams.entry(name).or_default()
    }

    /// Looks up a stream by name.
    pub fn pipeline(&self, name: &str) -> Option<&WorkPerDay> {
        self.streams.get(name)
    }

    /// Number of streams.
    pub fn entries(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, StreamName, WorkPerDay> {
        self.streams.iter()
    }

    pub(crate) const fn as_map(&self) -> &BTreeMap<StreamName, WorkPerDay> {
        &self.streams
    }
}

impl<'a> IntoIterator for &'a PipelineData {
    type Item = (&'a StreamName, &'a WorkPerDay);
    type IntoIter = btree_map::Iter<'a, StreamName, WorkPerDay>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
