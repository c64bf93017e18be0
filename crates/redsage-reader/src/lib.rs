//! Reader for decimal-hour CSV exports.
//!
//! The expected layout is one header line followed by one line per stream:
//!
//! ```text
//! Pipeline;2021-05-03;2021-05-04;Total
//! Pipeline A;7,50;"";7,50
//! Total;7,50;"";7,50
//! ```
//!
//! The first column names the stream, every other header cell is a date.
//! Empty cells count as zero hours. Columns can be skipped by header name and
//! the trailing summary line can be dropped.

use std::fs::File;
use std::io;
use std::num::ParseFloatError;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use redsage_core::PipelineData;
use thiserror::Error;

/// Reader errors.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The input file could not be opened.
    #[error("failed to open {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The input is not valid CSV.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    /// The input holds no header line.
    #[error("CSV input has no header line")]
    MissingHeader,
    /// A data line has no stream name.
    #[error("stream name cannot be empty (line {line})")]
    EmptyStreamName { line: u64 },
    /// A data line has more cells than the header.
    #[error("column {column} has no header (line {line})")]
    UnexpectedColumn { line: u64, column: usize },
    /// A cell is not a decimal number.
    #[error("could not parse '{value}' as hours (line {line}, column {column})")]
    InvalidNumber {
        value: String,
        line: u64,
        column: usize,
        #[source]
        source: ParseFloatError,
    },
    /// A cell holds a negative or non-finite hour count.
    #[error("invalid work duration {hours} (line {line}, column {column})")]
    InvalidDuration { hours: f64, line: u64, column: usize },
}

/// Options for reading a CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Separator between cells.
    /// Default: `;`.
    pub column_delimiter: u8,

    /// Decimal separator used by the export, e.g. `,` for `7,50`.
    /// Default: `.`.
    pub decimal_delimiter: char,

    /// Header names of columns to ignore (e.g. a totals column).
    pub skip_column_names: Vec<String>,

    /// Drop the last data line, which holds per-date totals.
    /// Default: true.
    pub skip_summary_line: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            column_delimiter: b';',
            decimal_delimiter: '.',
            skip_column_names: Vec::new(),
            skip_summary_line: true,
        }
    }
}

/// Reads CSV exports into [`PipelineData`].
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    options: CsvOptions,
}

impl CsvReader {
    pub const fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    /// Reads the export stored at `path`.
    pub fn read_path(&self, path: &Path) -> Result<PipelineData, ReaderError> {
        let file = File::open(path).map_err(|source| ReaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "reading CSV export");
        self.read(file)
    }

    /// Reads an export from any byte source.
    pub fn read<R: io::Read>(&self, input: R) -> Result<PipelineData, ReaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.options.column_delimiter)
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(input);

        let records = reader
            .records()
            .collect::<Result<Vec<StringRecord>, csv::Error>>()?;
        let Some((header, mut rows)) = records.split_first() else {
            return Err(ReaderError::MissingHeader);
        };

        if self.options.skip_summary_line {
            if let Some((summary, rest)) = rows.split_last() {
                let stream = summary.get(0).unwrap_or_default();
                tracing::debug!(stream, "skipping summary line");
                rows = rest;
            }
        }

        let skipped: Vec<bool> = header
            .iter()
            .map(|name| {
                self.options
                    .skip_column_names
                    .iter()
                    .any(|skip| skip == name.trim())
            })
            .collect();

        let mut data = PipelineData::new();
        for row in rows {
            let line = row.position().map_or(0, csv::Position::line);
            let name = row.get(0).unwrap_or_default().trim();
            let work = data
                .add_pipeline(name)
                .map_err(|_| ReaderError::EmptyStreamName { line })?;

            for (index, cell) in row.iter().enumerate().skip(1) {
                let column = index + 1;
                let Some(date) = header.get(index) else {
                    return Err(ReaderError::UnexpectedColumn { line, column });
                };
                if skipped[index] {
                    continue;
                }
                let hours = parse_hours(cell, self.options.decimal_delimiter, line, column)?;
                work.put_work_time(date.trim(), hours);
            }
        }

        tracing::info!(streams = data.entries(), "read CSV export");
        Ok(data)
    }
}

/// Parses a decimal hour cell; empty cells are zero.
fn parse_hours(
    cell: &str,
    decimal_delimiter: char,
    line: u64,
    column: usize,
) -> Result<f64, ReaderError> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let normalized = trimmed.replacen(decimal_delimiter, ".", 1);
    let hours: f64 = normalized
        .parse()
        .map_err(|source| ReaderError::InvalidNumber {
            value: cell.to_string(),
            line,
            column,
            source,
        })?;

    if !hours.is_finite() || hours < 0.0 {
        return Err(ReaderError::InvalidDuration {
            hours,
            line,
            column,
        });
    }
    Ok(hours)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const GERMAN_EXPORT: &str = r#"Anforderungspipeline;2021-05-03;2021-05-04;2021-05-05;2021-05-06;Gesamtzeit
Pipeline A;7,50;6,00;"";4,50;18,00
Gesamtzeit;7,50;6,00;"";4,50;18,00
"#;

    fn german_options() -> CsvOptions {
        CsvOptions {
            decimal_delimiter: ',',
            ..CsvOptions::default()
        }
    }

    #[test]
    fn default_options_match_export_format() {
        let options = CsvOptions::default();
        assert_eq!(options.column_delimiter, b';');
        assert_eq!(options.decimal_delimiter, '.');
        assert!(options.skip_column_names.is_empty());
        assert!(options.skip_summary_line);
    }

    #[test]
    fn reads_every_line_without_skipping() {
        let options = CsvOptions {
            skip_summary_line: false,
            ..german_options()
        };
        let actual = CsvReader::new(options).read(GERMAN_EXPORT.as_bytes()).unwrap();

        let mut expected = PipelineData::new();
        for name in ["Pipeline A", "Gesamtzeit"] {
            let entry = expected.add_pipeline(name).unwrap();
            entry.put_work_time("2021-05-03", 7.5);
            entry.put_work_time("2021-05-04", 6.0);
            entry.put_work_time("2021-05-05", 0.0);
            entry.put_work_time("2021-05-06", 4.5);
            entry.put_work_time("Gesamtzeit", 18.0);
        }
        assert_eq!(actual.entries(), 2);
        assert_eq!(actual, expected);
    }

    #[test]
    fn skips_summary_line_and_columns() {
        let options = CsvOptions {
            skip_column_names: vec!["Gesamtzeit".to_string()],
            ..german_options()
        };
        let actual = CsvReader::new(options).read(GERMAN_EXPORT.as_bytes()).unwrap();

        let mut expected = PipelineData::new();
        let entry = expected.add_pipeline("Pipeline A").unwrap();
        entry.put_work_time("2021-05-03", 7.5);
        entry.put_work_time("2021-05-04", 6.0);
        entry.put_work_time("2021-05-05", 0.0);
        entry.put_work_time("2021-05-06", 4.5);
        assert_eq!(actual, expected);
    }

    #[test]
    fn ignores_comment_lines() {
        let input = "# exported by the tracker\nStream,2021-05-03\nops,1.25\n";
        let options = CsvOptions {
            column_delimiter: b',',
            skip_summary_line: false,
            ..CsvOptions::default()
        };
        let actual = CsvReader::new(options).read(input.as_bytes()).unwrap();
        assert_eq!(actual.entries(), 1);
        assert!(actual.pipeline("ops").is_some());
    }

    #[test]
    fn rejects_non_numeric_cell() {
        let input = "Stream;2021-05-03\nops;lots\nTotal;0\n";
        let err = CsvReader::default().read(input.as_bytes()).unwrap_err();
        assert!(
            matches!(
                &err,
                ReaderError::InvalidNumber { value, line: 2, column: 2, .. } if value == "lots"
            ),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn rejects_negative_cell() {
        let input = "Stream;2021-05-03\nops;-1.5\nTotal;0\n";
        let err = CsvReader::default().read(input.as_bytes()).unwrap_err();
        assert!(
            matches!(err, ReaderError::InvalidDuration { line: 2, column: 2, .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn rejects_empty_stream_name() {
        let input = "Stream;2021-05-03\n;1\nTotal;1\n";
        let err = CsvReader::default().read(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ReaderError::EmptyStreamName { line: 2 }));
    }

    #[test]
    fn rejects_cells_without_header() {
        let input = "Stream;2021-05-03\nops;1;2\nTotal;1\n";
        let err = CsvReader::default().read(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ReaderError::UnexpectedColumn { line: 2, column: 3 }
        ));
    }

    #[test]
    fn rejects_empty_input() {
        let err = CsvReader::default().read(&b""[..]).unwrap_err();
        assert!(matches!(err, ReaderError::MissingHeader));
    }

    #[test]
    fn header_only_yields_no_streams() {
        let data = CsvReader::default()
            .read("Stream;2021-05-03\n".as_bytes())
            .unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn read_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GERMAN_EXPORT.as_bytes()).unwrap();

        let data = CsvReader::new(german_options()).read_path(file.path()).unwrap();
        assert_eq!(data.entries(), 1);
        assert!(data.pipeline("Pipeline A").is_some());
    }

    #[test]
    fn read_path_reports_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing.csv");
        let err = CsvReader::default().read_path(&path).unwrap_err();
        assert!(matches!(err, ReaderError::Io { .. }));
        assert!(err.to_string().contains("missing.csv"));
    }
}
