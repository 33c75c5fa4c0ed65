#![allow(dead_code)]

use std::time::Duration;

use chrono_bench::config::{BenchConfig, BenchmarkSection, CommandSpec};
use chrono_bench::types::RunMode;

/// Builder for `BenchConfig` that goes through the same validation as user
/// input.
pub struct BenchConfigBuilder {
    section: BenchmarkSection,
}

impl BenchConfigBuilder {
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            section: BenchmarkSection {
                command: Some(CommandSpec::Argv(
                    command.into_iter().map(Into::into).collect(),
                )),
                mode: Some(RunMode::Cli),
                skip_calibration: Some(true),
                ..BenchmarkSection::default()
            },
        }
    }

    /// Command given as one string, tokenized like `--command`.
    pub fn from_line(line: &str) -> Self {
        let mut builder = Self::new(["placeholder"]);
        builder.section.command = Some(CommandSpec::Line(line.to_string()));
        builder
    }

    pub fn phrase(mut self, phrase: &str) -> Self {
        self.section.phrase = Some(phrase.to_string());
        self
    }

    pub fn runs(mut self, runs: u32) -> Self {
        self.section.runs = Some(runs);
        self
    }

    pub fn warmups(mut self, warmups: u32) -> Self {
        self.section.warmups = Some(warmups);
        self
    }

    /// Timeout as a duration string, e.g. `"500ms"`.
    pub fn timeout(mut self, timeout: &str) -> Self {
        self.section.timeout = Some(timeout.to_string());
        self
    }

    pub fn timeout_duration(self, timeout: Duration) -> Self {
        let nanos = timeout.as_nanos();
        self.timeout(&format!("{nanos}ns"))
    }

    pub fn calibration(mut self, runs: u32) -> Self {
        self.section.calibration_runs = Some(runs);
        self.section.skip_calibration = Some(false);
        self
    }

    pub fn mode(mut self, mode: RunMode) -> Self {
        self.section.mode = Some(mode);
        self
    }

    pub fn section(self) -> BenchmarkSection {
        self.section
    }

    pub fn build(self) -> BenchConfig {
        BenchConfig::try_from(self.section).expect("Failed to build valid config from builder")
    }
}
