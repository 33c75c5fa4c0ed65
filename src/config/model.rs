// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::config::command_line::join_command;
use crate::types::RunMode;

/// Measured runs when neither the file nor the CLI says otherwise.
pub const DEFAULT_RUNS: u32 = 1;

/// Shell calibration samples when neither the file nor the CLI says otherwise.
pub const DEFAULT_CALIBRATION_RUNS: u32 = 5;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [benchmark]
/// command = "cargo build --release"
/// phrase = "Finished"
/// runs = 5
/// warmups = 1
/// timeout = "2m"
/// calibration = 10
/// mode = "cli"
/// ```
///
/// Every field is optional; CLI flags override whatever is set here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub benchmark: BenchmarkSection,
}

/// `[benchmark]` section, also used as the overlay produced from CLI flags.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BenchmarkSection {
    /// Either a single string (tokenized like `--command`) or an explicit
    /// argv array.
    #[serde(default)]
    pub command: Option<CommandSpec>,

    /// Substring to wait for in stdout/stderr. Empty means completion mode.
    #[serde(default)]
    pub phrase: Option<String>,

    #[serde(default)]
    pub warmups: Option<u32>,

    #[serde(default)]
    pub runs: Option<u32>,

    /// Duration string such as `"500ms"` or `"1m30s"`; `"0"` disables it.
    #[serde(default)]
    pub timeout: Option<String>,

    /// Number of shell calibration samples.
    #[serde(default, rename = "calibration")]
    pub calibration_runs: Option<u32>,

    #[serde(default)]
    pub skip_calibration: Option<bool>,

    #[serde(default)]
    pub mode: Option<RunMode>,
}

impl BenchmarkSection {
    /// Merge `overrides` on top of `self`; any field set in `overrides` wins.
    pub fn overlay(self, overrides: BenchmarkSection) -> BenchmarkSection {
        BenchmarkSection {
            command: overrides.command.or(self.command),
            phrase: overrides.phrase.or(self.phrase),
            warmups: overrides.warmups.or(self.warmups),
            runs: overrides.runs.or(self.runs),
            timeout: overrides.timeout.or(self.timeout),
            calibration_runs: overrides.calibration_runs.or(self.calibration_runs),
            skip_calibration: overrides.skip_calibration.or(self.skip_calibration),
            mode: overrides.mode.or(self.mode),
        }
    }
}

/// The command to benchmark as written by the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    /// A single string that still needs tokenizing.
    Line(String),
    /// Already split into program + arguments.
    Argv(Vec<String>),
}

/// Validated benchmark configuration.
///
/// Created once at startup and shared read-only by every run. Construct it
/// through `TryFrom<BenchmarkSection>` (see `validate.rs`) or, in tests,
/// [`BenchConfig::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Program followed by its arguments. Never empty.
    pub command: Vec<String>,
    /// `None` selects completion mode.
    pub phrase: Option<String>,
    /// Zero means no timeout.
    pub timeout: Duration,
    pub warmups: u32,
    pub runs: u32,
    pub calibration_runs: u32,
    pub skip_calibration: bool,
    pub mode: RunMode,
}

impl BenchConfig {
    /// Build a config for `command` with default counts, completion mode and
    /// no timeout.
    ///
    /// # Panics
    ///
    /// Panics if `command` is empty; use `TryFrom<BenchmarkSection>` for
    /// user input.
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command: Vec<String> = command.into_iter().map(Into::into).collect();
        assert!(!command.is_empty(), "BenchConfig requires a command");
        Self {
            command,
            phrase: None,
            timeout: Duration::ZERO,
            warmups: 0,
            runs: DEFAULT_RUNS,
            calibration_runs: DEFAULT_CALIBRATION_RUNS,
            skip_calibration: false,
            mode: RunMode::default(),
        }
    }

    pub fn with_phrase(mut self, phrase: impl Into<String>) -> Self {
        let phrase = phrase.into();
        self.phrase = if phrase.is_empty() { None } else { Some(phrase) };
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_warmups(mut self, warmups: u32) -> Self {
        self.warmups = warmups;
        self
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn program(&self) -> &str {
        &self.command[0]
    }

    pub fn args(&self) -> &[String] {
        &self.command[1..]
    }

    /// Some(timeout) when a timeout is configured.
    pub fn timeout_limit(&self) -> Option<Duration> {
        if self.timeout.is_zero() {
            None
        } else {
            Some(self.timeout)
        }
    }

    pub fn is_phrase_mode(&self) -> bool {
        self.phrase.is_some()
    }

    /// The command joined back into a display string, quoted so it splits
    /// back into the same argv.
    pub fn display_command(&self) -> String {
        join_command(&self.command)
    }
}
