//! redsage CLI library.
//!
//! This crate provides the CLI interface for converting work-hour exports
//! into timesheet time slots.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
