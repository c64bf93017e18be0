//! Run command: read an export, join its streams and crunch them into slots.
//!
//! Prints one block per stream with one line per date, or the crunched
//! output as JSON with `--json`.

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use redsage_core::{CrunchedOutput, Cruncher, TracingObserver, join_pipelines};
use redsage_reader::CsvReader;

use crate::Config;

#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// CSV export with decimal hours per stream and date.
    pub file: PathBuf,

    /// Lunch break length in minutes.
    #[arg(short = 'b', long = "break", value_name = "MINUTES")]
    pub lunch_break: Option<u32>,

    /// When work starts on every day.
    #[arg(long, value_name = "HH:MM")]
    pub day_start: Option<String>,

    /// When the lunch break starts.
    #[arg(long, value_name = "HH:MM")]
    pub lunch_start: Option<String>,

    /// Stream that keeps its own slots instead of being joined (repeatable).
    #[arg(short = 'p', long = "pipeline-single", value_name = "NAME")]
    pub single_pipelines: Vec<String>,

    /// Header of a column to ignore (repeatable).
    #[arg(short = 's', long = "skip-column", value_name = "NAME")]
    pub skip_columns: Vec<String>,

    /// Cell separator of the export.
    #[arg(long, value_name = "CHAR")]
    pub csv_column_delimiter: Option<char>,

    /// Decimal separator of the export, e.g. ',' for "7,50".
    #[arg(short = 'd', long, value_name = "CHAR")]
    pub decimal_delimiter: Option<char>,

    /// Keep the last line of the export instead of treating it as totals.
    #[arg(long)]
    pub keep_summary_line: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn merged_with(&self, config: &Config) -> Config {
        let mut merged = config.clone();
        if let Some(minutes) = self.lunch_break {
            merged.lunch_break_minutes = minutes;
        }
        if let Some(day_start) = &self.day_start {
            merged.day_start_time.clone_from(day_start);
        }
        if let Some(lunch_start) = &self.lunch_start {
            merged.lunch_start_time.clone_from(lunch_start);
        }
        if let Some(delimiter) = self.csv_column_delimiter {
            merged.csv_column_delimiter = delimiter;
        }
        if let Some(delimiter) = self.decimal_delimiter {
            merged.decimal_delimiter = delimiter;
        }
        if self.keep_summary_line {
            merged.ignore_summary_line = false;
        }
        merged.skip_columns.extend(self.skip_columns.iter().cloned());
        merged
            .single_pipelines
            .extend(self.single_pipelines.iter().cloned());
        merged
    }
}

/// Reads, joins and crunches the export, then writes the result.
pub fn run<W: Write>(writer: &mut W, args: &RunArgs, config: &Config) -> Result<()> {
    let config = args.merged_with(config);
    tracing::debug!(?config, "effective run configuration");

    let crunch_config = config
        .crunch_config()
        .context("invalid time configuration")?;
    let data = CsvReader::new(config.csv_options()?)
        .read_path(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let joined =
        join_pipelines(&data, &config.join_config()).context("failed to join streams")?;
    tracing::debug!(
        streams = data.entries(),
        joined_streams = joined.entries(),
        "joined streams"
    );

    let output = Cruncher::new(crunch_config)
        .with_observer(TracingObserver)
        .crunch(&joined)
        .context("failed to crunch work times")?;

    if args.json {
        writeln!(writer, "{}", format_output_json(&output)?)?;
    } else {
        write!(writer, "{}", format_output(&output))?;
    }
    Ok(())
}

// ========== Output Formatting ==========

/// Formats crunched slots for humans.
///
/// One block per stream, one line per date; split days show both slots.
pub fn format_output(output: &CrunchedOutput) -> String {
    let mut out = String::new();

    if output.is_empty() {
        writeln!(out, "No streams found.").unwrap();
        return out;
    }

    for (index, (stream, intervals)) in output.iter().enumerate() {
        if index > 0 {
            writeln!(out).unwrap();
        }
        writeln!(out, "{stream}").unwrap();
        for (date, slots) in intervals {
            let rendered = slots
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(out, "  {date}  {rendered}").unwrap();
        }
    }

    out
}

/// Formats crunched slots as pretty JSON.
pub fn format_output_json(output: &CrunchedOutput) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}
