// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{BenchmarkSection, CommandSpec};
use crate::errors::{ChronoError, Result};
use crate::types::RunMode;

/// Command-line arguments for `chrono`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "chrono",
    version,
    about = "Time a command until it exits or until a phrase appears in its output.",
    long_about = None,
    after_help = "Examples:\n  chrono --runs 5 -- cargo build\n  chrono --phrase \"Listening on\" --timeout 30s -- ./server\n  chrono --cli --command \"sh -c 'sleep 1; echo done'\""
)]
pub struct CliArgs {
    /// Phrase to wait for in stdout/stderr (if omitted, time until the
    /// command exits).
    #[arg(long, value_name = "TEXT")]
    pub phrase: Option<String>,

    /// Number of warmup runs before benchmarking.
    #[arg(long, value_name = "N")]
    pub warmups: Option<u32>,

    /// Number of measured runs.
    #[arg(long, value_name = "N")]
    pub runs: Option<u32>,

    /// Maximum time to wait for the phrase or command completion, e.g.
    /// `500ms`, `10s`, `1m30s` (default: no timeout).
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Number of calibration runs used to measure shell startup overhead.
    #[arg(long = "calibration", value_name = "N")]
    pub calibration_runs: Option<u32>,

    /// Skip calibration and don't subtract shell overhead.
    #[arg(long)]
    pub skip_calibration: bool,

    /// Print a plain report instead of the live terminal view.
    #[arg(long)]
    pub cli: bool,

    /// Command to benchmark as one quoted string (alternative to
    /// positional arguments).
    #[arg(long, value_name = "CMD")]
    pub command: Option<String>,

    /// Path to a TOML config file with a `[benchmark]` section.
    ///
    /// Default: `chrono.toml` in the current directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CHRONO_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Command to benchmark followed by its arguments (use `--` before it
    /// when it has flags of its own).
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command_args: Vec<String>,
}

impl CliArgs {
    /// Convert the flags that were actually given into a config overlay.
    pub fn to_overrides(&self) -> Result<BenchmarkSection> {
        let command = match (&self.command, self.command_args.is_empty()) {
            (Some(_), false) => {
                return Err(ChronoError::ConfigError(
                    "cannot specify both --command and positional arguments".to_string(),
                ));
            }
            (Some(line), true) => Some(CommandSpec::Line(line.clone())),
            (None, false) => Some(CommandSpec::Argv(self.command_args.clone())),
            (None, true) => None,
        };

        Ok(BenchmarkSection {
            command,
            phrase: self.phrase.clone(),
            warmups: self.warmups,
            runs: self.runs,
            timeout: self.timeout.clone(),
            calibration_runs: self.calibration_runs,
            skip_calibration: self.skip_calibration.then_some(true),
            mode: self.cli.then_some(RunMode::Cli),
        })
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
