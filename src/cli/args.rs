//! CLI argument definitions for `moyenne`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use moyenne::config::ConfigOverrides;
use moyenne::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts
/// to lowercase strings for config storage and to `logger::Level` for
/// runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `file`, `tables`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Compute a weighted year average interactively.
    ///
    /// Walks through track, year and per-subject grade entry, then
    /// prints the overall average and verdict.
    Calc {
        /// Write a Markdown result sheet to this file
        #[arg(short, long, value_name = "FILE")]
        report: Option<PathBuf>,
    },
    /// List the tracks and years the rule tables cover.
    Tracks,
    /// List one year's subjects with coefficients and grade components.
    Subjects {
        /// Track identifier (math, physics, info, sciences, lettres, musique)
        #[arg(value_name = "TRACK")]
        track: String,

        /// Year number (1-5)
        #[arg(value_name = "YEAR")]
        year: u8,

        /// Sub-level for split years (+4 or +5)
        #[arg(long, value_name = "VARIANT")]
        variant: Option<String>,
    },
    /// Show the completed-session count.
    Stats,
}

#[derive(Parser, Debug)]
#[command(
    name = "moyenne",
    about = "ENS weighted-average calculator",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config rule-table file
    #[arg(long = "config-tables", value_name = "FILE")]
    pub config_tables: Option<PathBuf>,

    /// Override config rule-table file (short form)
    #[arg(long = "tables", value_name = "FILE")]
    pub tables: Option<PathBuf>,

    /// Override config counter file
    #[arg(long = "config-counter", value_name = "FILE")]
    pub config_counter: Option<PathBuf>,

    /// Override config reports output directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports output directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Transforms CLI arguments into a `ConfigOverrides` struct that can
    /// be applied to the loaded configuration. Short-form flags (e.g.,
    /// `--tables`) take precedence over long-form flags (e.g.,
    /// `--config-tables`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            tables: self
                .tables
                .as_ref()
                .map(|p| p.to_string_lossy().to_string())
                .or_else(|| {
                    self.config_tables
                        .as_ref()
                        .map(|p| p.to_string_lossy().to_string())
                }),
            counter: self
                .config_counter
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            reports_dir: self
                .reports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string())
                .or_else(|| {
                    self.config_reports_dir
                        .as_ref()
                        .map(|p| p.to_string_lossy().to_string())
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_cli() -> Cli {
        Cli {
            log_level: None,
            verbose: false,
            debug_flag: false,
            log_file: None,
            config_level: None,
            config_log_file: None,
            config_verbose: None,
            config_tables: None,
            tables: None,
            config_counter: None,
            config_reports_dir: None,
            reports_dir: None,
            command: Command::Config { subcommand: None },
        }
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Warn), Level::Warn);
        assert_eq!(Level::from(LogLevelArg::Info), Level::Info);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = bare_cli().to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.tables.is_none());
        assert!(overrides.counter.is_none());
        assert!(overrides.reports_dir.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let mut cli = bare_cli();
        cli.config_level = Some(LogLevelArg::Debug);
        cli.config_log_file = Some(PathBuf::from("/tmp/test.log"));
        cli.config_verbose = Some(true);
        cli.tables = Some(PathBuf::from("/tables.toml"));
        cli.reports_dir = Some(PathBuf::from("/output"));

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.tables, Some("/tables.toml".to_string()));
        assert_eq!(overrides.reports_dir, Some("/output".to_string()));
    }

    #[test]
    fn test_short_form_precedence_over_long_form() {
        let mut cli = bare_cli();
        cli.config_tables = Some(PathBuf::from("/long/tables.toml"));
        cli.tables = Some(PathBuf::from("/short/tables.toml"));
        cli.config_reports_dir = Some(PathBuf::from("/long/out"));
        cli.reports_dir = Some(PathBuf::from("/short/out"));

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.tables, Some("/short/tables.toml".to_string()));
        assert_eq!(overrides.reports_dir, Some("/short/out".to_string()));
    }

    #[test]
    fn test_long_form_when_short_form_absent() {
        let mut cli = bare_cli();
        cli.config_tables = Some(PathBuf::from("/long/tables.toml"));
        cli.config_reports_dir = Some(PathBuf::from("/long/out"));

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.tables, Some("/long/tables.toml".to_string()));
        assert_eq!(overrides.reports_dir, Some("/long/out".to_string()));
    }
}
