//! Core domain logic for redsage.
//!
//! This crate turns decimal daily work hours into wall-clock time slots:
//! - Wall clock: date/time-of-day arithmetic at minute granularity
//! - Lunch window: detecting work that runs past the lunch start
//! - Crunching: splitting each day's work around the lunch break
//! - Joining: merging streams into one before crunching

mod crunch;
pub mod error;
pub mod join;
pub mod lunch;
pub mod observer;
mod pipeline;
mod slot;
pub mod types;
pub mod wall_clock;

pub use crunch::{
    CrunchConfig, Cruncher, DEFAULT_DAY_START, DEFAULT_LUNCH_BREAK_MINUTES, DEFAULT_LUNCH_START,
};
pub use error::CrunchError;
pub use join::{JoinConfig, join_pipelines};
pub use lunch::LunchWindow;
pub use observer::{CrunchObserver, NoopObserver, TracingObserver};
pub use pipeline::{PipelineData, WorkPerDay};
pub use slot::{CrunchedOutput, DayIntervals, EMPTY_LABEL, TimeSlot};
pub use types::{StreamName, ValidationError};
