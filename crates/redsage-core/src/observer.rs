//! Hooks for watching the crunching engine work.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::slot::TimeSlot;
use crate::types::StreamName;

/// Receives progress notifications from a [`Cruncher`](crate::Cruncher).
///
/// Streams and dates are crunched in parallel, so implementations must be
/// thread-safe and must not assume any call order across dates.
pub trait CrunchObserver: Send + Sync {
    /// Called before the dates of a stream are crunched.
    fn pipeline_started(&self, _stream: &StreamName, _days: usize) {}

    /// Called once per crunched date with the slots produced for it.
    fn day_crunched(
        &self,
        _stream: &StreamName,
        _date: NaiveDate,
        _hours: f64,
        _slots: &[TimeSlot],
    ) {
    }
}

impl<T: CrunchObserver + ?Sized> CrunchObserver for Arc<T> {
    fn pipeline_started(&self, stream: &StreamName, days: usize) {
        (**self).pipeline_started(stream, days);
    }

    fn day_crunched(&self, stream: &StreamName, date: NaiveDate, hours: f64, slots: &[TimeSlot]) {
        (**self).day_crunched(stream, date, hours, slots);
    }
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CrunchObserver for NoopObserver {}

/// Observer that forwards notifications to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CrunchObserver for TracingObserver {
    fn pipeline_started(&self, stream: &StreamName, days: usize) {
        tracing::debug!(%stream, days, "crunching stream");
    }

    fn day_crunched(&self, stream: &StreamName, date: NaiveDate, hours: f64, slots: &[TimeSlot]) {
        let lunch_split = slots.len() > 1;
        let worked_minutes: i64 = slots.iter().map(TimeSlot::worked_minutes).sum();
        tracing::debug!(
            %stream,
            %date,
            hours,
            worked_minutes,
            slots = slots.len(),
            lunch_split,
            "crunched day"
        );
    }
}
