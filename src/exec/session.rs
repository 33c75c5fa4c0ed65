// src/exec/session.rs

//! Streaming session: a run that also exposes its output line by line.
//!
//! The session runs exactly the same detection as [`run_once`] with a
//! [`LineSink`] attached, so its final [`RunResult`] matches a batch run of
//! the same command. Consumers pull events with [`StreamingSession::next_event`]:
//!
//! ```text
//! Line(..)* [Line(MatchMarker)] Finished(result)   then None
//! ```
//!
//! [`run_once`]: crate::exec::run_once

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::config::BenchConfig;
use crate::engine::{LaunchedRun, RunOutcome};
use crate::errors::Result;
use crate::exec::backend::{ProcessLauncher, TokioLauncher};
use crate::exec::lines::LineSink;
use crate::types::{OutputLine, RunResult};

/// One step of the pull protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Line(OutputLine),
    Finished(RunResult),
}

#[derive(Debug)]
enum SessionState {
    Running,
    /// Run resolved; buffered lines are still being handed out.
    Draining(RunOutcome),
    /// Marker already delivered; `Finished` goes out on the next pull.
    Finishing(RunResult),
    Done,
}

/// Handle to a running streaming session.
///
/// Dropping the handle (or calling [`cancel`](Self::cancel)) aborts the run;
/// the child is killed on drop.
#[derive(Debug)]
pub struct StreamingSession {
    lines: mpsc::Receiver<OutputLine>,
    lines_open: bool,
    done_rx: oneshot::Receiver<RunOutcome>,
    task: JoinHandle<()>,
    dropped: Arc<AtomicU64>,
    shell_overhead: Duration,
    state: SessionState,
}

impl StreamingSession {
    /// Launch the configured command and start streaming its output.
    ///
    /// Launch failures are returned here, before any event is produced.
    pub fn start(config: &BenchConfig, shell_overhead: Duration) -> Result<Self> {
        Self::start_with(&TokioLauncher, config, shell_overhead)
    }

    /// [`start`](Self::start) with an explicit process launcher.
    pub fn start_with(
        launcher: &dyn ProcessLauncher,
        config: &BenchConfig,
        shell_overhead: Duration,
    ) -> Result<Self> {
        let run = LaunchedRun::launch(launcher, config)?;

        let (sink, lines) = LineSink::channel();
        let (done_tx, done_rx) = oneshot::channel();

        let dropped = sink.dropped_counter();
        let task_config = config.clone();
        let task = tokio::spawn(async move {
            let outcome = run.detect(&task_config, Some(sink)).await;
            let _ = done_tx.send(outcome);
        });

        Ok(Self {
            lines,
            lines_open: true,
            done_rx,
            task,
            dropped,
            shell_overhead,
            state: SessionState::Running,
        })
    }

    /// Pull the next event.
    ///
    /// Buffered lines are always delivered before `Finished`. Returns `None`
    /// once `Finished` has been handed out.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        loop {
            match std::mem::replace(&mut self.state, SessionState::Done) {
                SessionState::Done => return None,
                SessionState::Finishing(result) => return Some(SessionEvent::Finished(result)),
                SessionState::Draining(outcome) => {
                    // Hand out whatever was still buffered when the run resolved.
                    if let Ok(line) = self.lines.try_recv() {
                        self.state = SessionState::Draining(outcome);
                        return Some(SessionEvent::Line(line));
                    }
                    return Some(self.finish(outcome));
                }
                SessionState::Running => {
                    self.state = SessionState::Running;
                    let outcome = tokio::select! {
                        biased;

                        line = self.lines.recv(), if self.lines_open => match line {
                            Some(line) => return Some(SessionEvent::Line(line)),
                            None => {
                                self.lines_open = false;
                                continue;
                            }
                        },

                        outcome = &mut self.done_rx => match outcome {
                            Ok(outcome) => outcome,
                            Err(_) => {
                                error!("detection task ended without a result");
                                RunOutcome::NoMatch
                            }
                        },
                    };
                    self.state = SessionState::Draining(outcome);
                }
            }
        }
    }

    /// Abort the run; the child process is killed.
    pub fn cancel(&mut self) {
        if !matches!(self.state, SessionState::Done) {
            debug!("cancelling streaming session");
        }
        self.task.abort();
        self.state = SessionState::Done;
    }

    /// Lines dropped because the consumer fell behind.
    pub fn dropped_lines(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn finish(&mut self, outcome: RunOutcome) -> SessionEvent {
        let result = outcome.into_result(self.shell_overhead);
        if outcome.is_match() {
            self.state = SessionState::Finishing(result);
            SessionEvent::Line(OutputLine::match_marker())
        } else {
            self.state = SessionState::Done;
            SessionEvent::Finished(result)
        }
    }
}

impl Drop for StreamingSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}
