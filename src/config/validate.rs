// src/config/validate.rs

use crate::config::command_line::parse_command_string;
use crate::config::duration::parse_duration;
use crate::config::model::{
    BenchConfig, BenchmarkSection, CommandSpec, DEFAULT_CALIBRATION_RUNS, DEFAULT_RUNS,
};
use crate::errors::{ChronoError, Result};

impl TryFrom<BenchmarkSection> for BenchConfig {
    type Error = crate::errors::ChronoError;

    fn try_from(raw: BenchmarkSection) -> std::result::Result<Self, Self::Error> {
        let command = resolve_command(raw.command)?;
        let runs = validate_runs(raw.runs)?;
        let timeout = match raw.timeout.as_deref() {
            Some(s) => parse_duration(s).map_err(|e| {
                ChronoError::ConfigError(format!("invalid timeout: {e}"))
            })?,
            None => std::time::Duration::ZERO,
        };

        Ok(BenchConfig {
            command,
            phrase: raw.phrase.filter(|p| !p.is_empty()),
            timeout,
            warmups: raw.warmups.unwrap_or(0),
            runs,
            calibration_runs: raw.calibration_runs.unwrap_or(DEFAULT_CALIBRATION_RUNS),
            skip_calibration: raw.skip_calibration.unwrap_or(false),
            mode: raw.mode.unwrap_or_default(),
        })
    }
}

fn resolve_command(spec: Option<CommandSpec>) -> Result<Vec<String>> {
    let command = match spec {
        Some(CommandSpec::Line(line)) => parse_command_string(&line)?,
        Some(CommandSpec::Argv(argv)) => argv,
        None => {
            return Err(ChronoError::ConfigError(
                "command to benchmark is required".to_string(),
            ));
        }
    };

    match command.first() {
        None => Err(ChronoError::ConfigError(
            "command to benchmark is required".to_string(),
        )),
        Some(program) if program.is_empty() => Err(ChronoError::ConfigError(
            "command program must not be empty".to_string(),
        )),
        Some(_) => Ok(command),
    }
}

fn validate_runs(runs: Option<u32>) -> Result<u32> {
    match runs.unwrap_or(DEFAULT_RUNS) {
        0 => Err(ChronoError::ConfigError(
            "runs must be >= 1 (got 0)".to_string(),
        )),
        n => Ok(n),
    }
}
