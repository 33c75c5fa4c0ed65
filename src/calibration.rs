// src/calibration.rs

//! Shell startup overhead calibration.
//!
//! Launching any process costs something before the target command does any
//! work. We estimate that fixed cost by timing `<shell> -c true` a few times
//! and later subtract the mean from every measured run.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::time::{Instant, timeout};
use tracing::{debug, info, warn};

/// Shell used when `$SHELL` is unset, or when it fails.
pub const FALLBACK_SHELL: &str = "/bin/sh";

/// Upper bound for a single calibration sample.
pub const SAMPLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a single calibration sample was discarded.
#[derive(Error, Debug)]
pub enum SampleError {
    #[error("spawning {shell}: {source}")]
    Spawn {
        shell: String,
        #[source]
        source: io::Error,
    },

    #[error("waiting for {shell}: {source}")]
    Wait {
        shell: String,
        #[source]
        source: io::Error,
    },

    #[error("{shell} did not finish within {limit:?}")]
    TimedOut { shell: String, limit: Duration },

    #[error("{shell} exited with {status}")]
    Failed { shell: String, status: ExitStatus },
}

/// Result of a calibration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationReport {
    /// Mean of the successful samples, or zero if none succeeded.
    pub overhead: Duration,
    /// Shell tried first for every sample.
    pub shell: String,
    pub succeeded: u32,
    pub failed: u32,
}

impl CalibrationReport {
    /// True when every sample failed and the overhead fell back to zero.
    pub fn is_degraded(&self) -> bool {
        self.succeeded == 0 && self.failed > 0
    }
}

/// Times no-op shell invocations.
#[derive(Debug, Clone)]
pub struct ShellCalibrator {
    shell: String,
    fallback: String,
    sample_timeout: Duration,
}

impl ShellCalibrator {
    pub fn new(shell: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            fallback: fallback.into(),
            sample_timeout: SAMPLE_TIMEOUT,
        }
    }

    /// The user's `$SHELL` if set and non-empty, else [`FALLBACK_SHELL`].
    pub fn from_env() -> Self {
        let shell = std::env::var("SHELL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_SHELL.to_string());
        Self::new(shell, FALLBACK_SHELL)
    }

    pub fn with_sample_timeout(mut self, sample_timeout: Duration) -> Self {
        self.sample_timeout = sample_timeout;
        self
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Take `runs` samples and average the successful ones.
    ///
    /// A failing sample is retried once with the fallback shell (unless it
    /// already was the fallback); if that fails too, the sample is dropped.
    pub async fn calibrate(&self, runs: u32) -> CalibrationReport {
        let mut samples: Vec<Duration> = Vec::with_capacity(runs as usize);
        let mut failed = 0u32;

        for run in 1..=runs {
            match self.sample_with_fallback(run).await {
                Some(sample) => {
                    debug!(run, sample_us = sample.as_micros() as u64, "calibration sample");
                    samples.push(sample);
                }
                None => failed += 1,
            }
        }

        let overhead = if samples.is_empty() {
            if runs > 0 {
                warn!(runs, "all calibration runs failed, using 0 overhead");
            }
            Duration::ZERO
        } else {
            let total: Duration = samples.iter().sum();
            total / samples.len() as u32
        };

        info!(
            shell = %self.shell,
            succeeded = samples.len(),
            failed,
            overhead_us = overhead.as_micros() as u64,
            "shell calibration finished"
        );

        CalibrationReport {
            overhead,
            shell: self.shell.clone(),
            succeeded: samples.len() as u32,
            failed,
        }
    }

    async fn sample_with_fallback(&self, run: u32) -> Option<Duration> {
        match self.sample(&self.shell).await {
            Ok(sample) => Some(sample),
            Err(err) => {
                warn!(run, shell = %self.shell, error = %err, "calibration run failed");
                if self.shell == self.fallback {
                    return None;
                }
                match self.sample(&self.fallback).await {
                    Ok(sample) => Some(sample),
                    Err(err) => {
                        warn!(
                            run,
                            shell = %self.fallback,
                            error = %err,
                            "calibration run failed completely"
                        );
                        None
                    }
                }
            }
        }
    }

    /// Time one `<shell> -c true`.
    pub async fn sample(&self, shell: &str) -> Result<Duration, SampleError> {
        let start = Instant::now();

        let mut child = Command::new(shell)
            .args(["-c", "true"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SampleError::Spawn {
                shell: shell.to_string(),
                source,
            })?;

        let status = match timeout(self.sample_timeout, child.wait()).await {
            Ok(status) => status.map_err(|source| SampleError::Wait {
                shell: shell.to_string(),
                source,
            })?,
            Err(_) => {
                let _ = child.start_kill();
                return Err(SampleError::TimedOut {
                    shell: shell.to_string(),
                    limit: self.sample_timeout,
                });
            }
        };
        let elapsed = start.elapsed();

        if !status.success() {
            return Err(SampleError::Failed {
                shell: shell.to_string(),
                status,
            });
        }

        Ok(elapsed)
    }
}

/// Estimate shell startup overhead from `sample_count` runs of the user's
/// shell. Never fails: total failure yields zero.
pub async fn calibrate_overhead(sample_count: u32) -> Duration {
    ShellCalibrator::from_env().calibrate(sample_count).await.overhead
}
