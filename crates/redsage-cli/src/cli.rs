//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::run::RunArgs;

/// Maintain sanity while turning tracked work hours into timesheet entries.
///
/// Reads decimal hours per stream and date, joins the streams and splits
/// every day into wall-clock slots around the lunch break.
#[derive(Debug, Parser)]
#[command(name = "redsage", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a CSV export into timesheet time slots.
    Run(RunArgs),

    /// Print the effective configuration as JSON.
    Config,
}
