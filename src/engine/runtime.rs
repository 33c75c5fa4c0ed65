// src/engine/runtime.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::BenchConfig;
use crate::errors::{ChronoError, Result};
use crate::exec::backend::{LaunchedProcess, ProcessLauncher};
use crate::exec::lines::LineSink;
use crate::exec::scanner::{ScanContext, scan_stream};
use crate::types::StreamKind;

use super::core::{DetectionCore, RunCommand};
use super::{RunEvent, RunOutcome};

/// How long trailing output may still be read after the exit status was
/// observed.
pub const EXIT_DRAIN_GRACE: Duration = Duration::from_millis(100);

/// A target process that has been started but not yet raced.
///
/// Launching is split from detection so that launch failures surface to the
/// caller synchronously, before any task is spawned.
pub struct LaunchedRun {
    process: LaunchedProcess,
    start: Instant,
}

impl std::fmt::Debug for LaunchedRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchedRun")
            .field("pid", &self.process.handle.id())
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}

impl LaunchedRun {
    /// Start the configured command and record the launch timestamp.
    ///
    /// Failure to start is fatal for the run and is never retried.
    pub fn launch(launcher: &dyn ProcessLauncher, config: &BenchConfig) -> Result<Self> {
        let program = config.program();

        let start = Instant::now();
        let process = launcher
            .launch(program, config.args())
            .map_err(|source| ChronoError::Launch {
                program: program.to_string(),
                source,
            })?;

        info!(
            command = %config.display_command(),
            pid = ?process.handle.id(),
            phrase = ?config.phrase,
            timeout_ms = config.timeout.as_millis() as u64,
            "started run"
        );

        Ok(Self { process, start })
    }

    pub fn started_at(&self) -> Instant {
        self.start
    }

    /// Race the run's event sources until the core resolves it.
    ///
    /// - Spawns one scanner per captured stream.
    /// - Polls match, timeout, exit, scanner completion and drain deadline in
    ///   one biased `select!`, in that priority order.
    /// - Executes the core's commands (cancel scanners, kill, arm drain).
    ///
    /// When `sink` is set every scanned line is offered to it; this is the
    /// only difference between batch runs and streaming sessions.
    pub async fn detect(self, config: &BenchConfig, sink: Option<LineSink>) -> RunOutcome {
        let LaunchedRun { mut process, start } = self;

        let cancel = CancellationToken::new();
        let (match_tx, mut match_rx) = mpsc::channel::<Duration>(1);

        let mut scanners = JoinSet::new();
        {
            let ctx = ScanContext {
                phrase: config.phrase.as_deref().map(Arc::from),
                start,
                match_tx,
                cancel: cancel.clone(),
                sink,
            };
            if let Some(stdout) = process.stdout.take() {
                scanners.spawn(scan_stream(stdout, StreamKind::Stdout, ctx.clone()));
            }
            if let Some(stderr) = process.stderr.take() {
                scanners.spawn(scan_stream(stderr, StreamKind::Stderr, ctx));
            }
        }

        let mut core = DetectionCore::new(config.is_phrase_mode());
        let deadline = config.timeout_limit().map(|limit| start + limit);
        let mut drain_deadline: Option<Instant> = None;
        let mut exited = false;
        let mut timeout_fired = false;

        let mut queued = if scanners.is_empty() {
            Some(RunEvent::OutputExhausted)
        } else {
            None
        };

        let outcome = loop {
            let event = match queued.take() {
                Some(event) => event,
                None => tokio::select! {
                    biased;

                    Some(elapsed) = match_rx.recv() => RunEvent::PhraseMatched(elapsed),

                    _ = sleep_until_opt(deadline), if !timeout_fired => {
                        timeout_fired = true;
                        RunEvent::TimedOut
                    }

                    status = process.handle.wait(), if !exited => {
                        exited = true;
                        let elapsed = start.elapsed();
                        match status {
                            Ok(code) => debug!(exit_code = ?code, "target process exited"),
                            Err(e) => warn!(error = %e, "failed to wait for target process; treating as exited"),
                        }
                        RunEvent::ProcessExited(elapsed)
                    }

                    Some(joined) = scanners.join_next(), if !scanners.is_empty() => {
                        match joined {
                            Ok(scan) => trace!(?scan, "scanner finished"),
                            Err(e) => warn!(error = %e, "scanner task failed"),
                        }
                        if !scanners.is_empty() {
                            continue;
                        }
                        RunEvent::OutputExhausted
                    }

                    _ = sleep_until_opt(drain_deadline), if drain_deadline.is_some() => {
                        drain_deadline = None;
                        RunEvent::DrainElapsed
                    }
                },
            };

            trace!(?event, "detection event");
            let step = core.step(event);

            for command in step.commands {
                match command {
                    RunCommand::CancelScanners => cancel.cancel(),
                    RunCommand::KillProcess => {
                        if let Err(e) = process.handle.start_kill() {
                            debug!(error = %e, "kill failed; process likely already exited");
                        }
                    }
                    RunCommand::StartDrain => {
                        drain_deadline = Some(Instant::now() + EXIT_DRAIN_GRACE);
                    }
                }
            }

            if let Some(outcome) = step.outcome {
                break outcome;
            }
        };

        // Idempotent; makes sure no scanner outlives the run even if the
        // core resolved without asking for it.
        cancel.cancel();
        scanners.abort_all();

        info!(?outcome, "run resolved");
        outcome
    }
}

/// Sleep until `deadline`, or forever when there is none.
async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
