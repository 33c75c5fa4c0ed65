// src/driver.rs

//! Batch benchmark sequence for `--cli` mode.
//!
//! calibrate (unless skipped) -> warmups -> measured runs -> summary.
//! Runs are strictly sequential. Progress goes through [`Printer`].

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::calibration::{CalibrationReport, ShellCalibrator};
use crate::config::BenchConfig;
use crate::errors::Result;
use crate::exec::{ProcessLauncher, TokioLauncher, run_once_with};
use crate::output::Printer;
use crate::stats::{Statistics, compute_statistics};
use crate::types::RunResult;

/// Everything a finished benchmark produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchReport {
    pub overhead: Duration,
    /// `None` when calibration was skipped.
    pub calibration: Option<CalibrationReport>,
    pub warmups: Vec<RunResult>,
    pub results: Vec<RunResult>,
}

impl BenchReport {
    pub fn successful_durations(&self) -> Vec<Duration> {
        self.results
            .iter()
            .filter(|r| r.found)
            .map(|r| r.duration)
            .collect()
    }

    pub fn failed_runs(&self) -> usize {
        self.results.iter().filter(|r| !r.found).count()
    }

    pub fn statistics(&self) -> Statistics {
        compute_statistics(&self.successful_durations())
    }
}

/// Owns the process launcher and the shell calibrator used for a benchmark.
#[derive(Clone)]
pub struct BenchDriver {
    launcher: Arc<dyn ProcessLauncher>,
    calibrator: ShellCalibrator,
}

impl std::fmt::Debug for BenchDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchDriver")
            .field("calibrator", &self.calibrator)
            .finish_non_exhaustive()
    }
}

impl Default for BenchDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchDriver {
    /// Real processes, calibrated against the user's shell.
    pub fn new() -> Self {
        Self {
            launcher: Arc::new(TokioLauncher),
            calibrator: ShellCalibrator::from_env(),
        }
    }

    pub fn with_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn with_calibrator(mut self, calibrator: ShellCalibrator) -> Self {
        self.calibrator = calibrator;
        self
    }

    pub fn launcher(&self) -> &dyn ProcessLauncher {
        self.launcher.as_ref()
    }

    pub fn calibrator(&self) -> &ShellCalibrator {
        &self.calibrator
    }

    /// Run the configured calibration, or return `None` when it is skipped.
    pub async fn calibrate(&self, config: &BenchConfig) -> Option<CalibrationReport> {
        if config.skip_calibration {
            debug!("calibration skipped");
            return None;
        }
        Some(self.calibrator.calibrate(config.calibration_runs).await)
    }

    /// One measured (or warmup) run.
    pub async fn run_one(&self, config: &BenchConfig, overhead: Duration) -> Result<RunResult> {
        run_once_with(self.launcher.as_ref(), config, overhead).await
    }

    /// Full batch sequence, reporting through `printer`.
    ///
    /// Returns the collected results; a launch failure aborts the sequence.
    pub async fn run<W: Write>(
        &self,
        config: &BenchConfig,
        printer: &mut Printer<W>,
    ) -> Result<BenchReport> {
        let mut report = BenchReport::default();

        if !config.skip_calibration {
            printer.print_calibration(config.calibration_runs)?;
            printer.flush()?;
        }
        if let Some(calibration) = self.calibrate(config).await {
            if calibration.is_degraded() {
                printer.print_calibration_degraded()?;
            }
            printer.print_shell_overhead(calibration.overhead)?;
            report.overhead = calibration.overhead;
            report.calibration = Some(calibration);
        }

        if config.warmups > 0 {
            printer.print_warmup_header(config.warmups)?;
            printer.flush()?;
            for run in 1..=config.warmups {
                let result = self.run_one(config, report.overhead).await?;
                printer.print_warmup_result(run, &result)?;
                printer.flush()?;
                report.warmups.push(result);
            }
            printer.print_warmups_done()?;
        }

        printer.print_benchmark_header(config.runs)?;
        printer.flush()?;
        for run in 1..=config.runs {
            let result = self.run_one(config, report.overhead).await?;
            debug!(run, found = result.found, duration = ?result.duration, "benchmark run done");
            printer.print_benchmark_result(run, &result)?;
            printer.flush()?;
            report.results.push(result);
        }

        printer.print_summary(&report.results, config, report.overhead)?;
        printer.flush()?;

        info!(
            runs = report.results.len(),
            failed = report.failed_runs(),
            "benchmark finished"
        );
        Ok(report)
    }
}
