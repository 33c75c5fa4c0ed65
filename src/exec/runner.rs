// src/exec/runner.rs

//! Batch process runner.

use std::time::Duration;

use crate::config::BenchConfig;
use crate::engine::LaunchedRun;
use crate::errors::Result;
use crate::exec::backend::{ProcessLauncher, TokioLauncher};
use crate::types::RunResult;

/// Run the configured command once and measure it.
///
/// - Completion mode (no phrase): time until the process exits.
/// - Phrase mode: time until the phrase first appears on stdout or stderr.
///
/// `shell_overhead` is subtracted from the measured time, saturating at zero.
/// A timeout or a missed phrase yields `found == false`; only a failure to
/// start the command is an error.
pub async fn run_once(config: &BenchConfig, shell_overhead: Duration) -> Result<RunResult> {
    run_once_with(&TokioLauncher, config, shell_overhead).await
}

/// [`run_once`] with an explicit process launcher.
pub async fn run_once_with(
    launcher: &dyn ProcessLauncher,
    config: &BenchConfig,
    shell_overhead: Duration,
) -> Result<RunResult> {
    let run = LaunchedRun::launch(launcher, config)?;
    let outcome = run.detect(config, None).await;
    Ok(outcome.into_result(shell_overhead))
}
