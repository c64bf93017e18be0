//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use redsage_core::{
    CrunchConfig, CrunchError, DEFAULT_DAY_START, DEFAULT_LUNCH_BREAK_MINUTES,
    DEFAULT_LUNCH_START, JoinConfig,
};
use redsage_reader::CsvOptions;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// When work starts on every day (`HH:MM[:SS]`).
    pub day_start_time: String,

    /// When the lunch break starts (`HH:MM[:SS]`).
    pub lunch_start_time: String,

    /// Lunch break length in minutes.
    pub lunch_break_minutes: u32,

    /// Cell separator of the CSV export.
    pub csv_column_delimiter: char,

    /// Decimal separator of the CSV export.
    pub decimal_delimiter: char,

    /// Drop the trailing totals line of the export.
    pub ignore_summary_line: bool,

    /// Header names of columns to ignore.
    pub skip_columns: Vec<String>,

    /// Streams that are not joined with the others.
    pub single_pipelines: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            day_start_time: DEFAULT_DAY_START.to_string(),
            lunch_start_time: DEFAULT_LUNCH_START.to_string(),
            lunch_break_minutes: DEFAULT_LUNCH_BREAK_MINUTES,
            csv_column_delimiter: ';',
            decimal_delimiter: '.',
            ignore_summary_line: true,
            skip_columns: Vec::new(),
            single_pipelines: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (REDSAGE_*)
        figment = figment.merge(Env::prefixed("REDSAGE_"));

        figment.extract()
    }

    /// Parses the time settings for the crunching engine.
    pub fn crunch_config(&self) -> Result<CrunchConfig, CrunchError> {
        CrunchConfig::new(
            &self.day_start_time,
            &self.lunch_start_time,
            self.lunch_break_minutes,
        )
    }

    /// Builds the CSV reader options.
    pub fn csv_options(&self) -> Result<CsvOptions> {
        let column_delimiter = u8::try_from(self.csv_column_delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| {
                format!(
                    "CSV column delimiter must be a single ASCII character, got '{}'",
                    self.csv_column_delimiter
                )
            })?;

        Ok(CsvOptions {
            column_delimiter,
            decimal_delimiter: self.decimal_delimiter,
            skip_column_names: self.skip_columns.clone(),
            skip_summary_line: self.ignore_summary_line,
        })
    }

    pub fn join_config(&self) -> JoinConfig {
        JoinConfig {
            single_pipeline_names: self.single_pipelines.clone(),
        }
    }
}

/// Returns the platform-specific config directory for redsage.
///
/// On Linux: `~/.config/redsage`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("redsage"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_redsage() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "redsage");
    }

    #[test]
    fn test_default_config_matches_export_format() {
        let config = Config::default();
        assert_eq!(config.day_start_time, "08:00:00");
        assert_eq!(config.lunch_start_time, "12:00:00");
        assert_eq!(config.lunch_break_minutes, 60);
        assert_eq!(config.csv_column_delimiter, ';');
        assert_eq!(config.decimal_delimiter, '.');
        assert!(config.ignore_summary_line);
    }

    #[test]
    fn test_default_crunch_config_is_valid() {
        assert_eq!(
            Config::default().crunch_config().unwrap(),
            CrunchConfig::default()
        );
    }

    #[test]
    fn test_invalid_lunch_start_is_reported() {
        let config = Config {
            lunch_start_time: "noon".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.crunch_config(),
            Err(CrunchError::InvalidTimeFormat {
                value: "noon".to_string()
            })
        );
    }

    #[test]
    fn test_csv_options_use_configured_delimiters() {
        let config = Config {
            csv_column_delimiter: ',',
            decimal_delimiter: ',',
            skip_columns: vec!["Gesamtzeit".to_string()],
            ignore_summary_line: false,
            ..Config::default()
        };
        let options = config.csv_options().unwrap();
        assert_eq!(options.column_delimiter, b',');
        assert_eq!(options.decimal_delimiter, ',');
        assert_eq!(options.skip_column_names, vec!["Gesamtzeit".to_string()]);
        assert!(!options.skip_summary_line);
    }

    #[test]
    fn test_csv_options_reject_non_ascii_delimiter() {
        let config = Config {
            csv_column_delimiter: '§',
            ..Config::default()
        };
        assert!(config.csv_options().is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lunch_break_minutes = 45").unwrap();
        writeln!(file, r#"decimal_delimiter = ",""#).unwrap();
        writeln!(file, r#"single_pipelines = ["Support"]"#).unwrap();
        file.flush().unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.lunch_break_minutes, 45);
        assert_eq!(config.decimal_delimiter, ',');
        assert_eq!(config.single_pipelines, vec!["Support".to_string()]);
        assert_eq!(config.join_config().single_pipeline_names, vec!["Support"]);
    }
}
