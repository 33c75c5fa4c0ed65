// src/engine/core.rs

//! Pure detection state machine.
//!
//! This module contains a synchronous, deterministic core that consumes
//! [`RunEvent`]s and produces:
//! - an updated core state
//! - a list of commands describing what the IO shell should do next
//! - the final [`RunOutcome`], exactly once
//!
//! The async shell (`engine::runtime`) owns the process, the scanners and the
//! timers. The core has no channels, no Tokio types and performs no IO, so
//! the precedence rules can be unit tested in isolation.
//!
//! Rules:
//! - a match resolves the run immediately (phrase mode only)
//! - a timeout resolves the run unless the process already exited
//! - an exit is *confirmed* once the output is exhausted or the drain grace
//!   elapsed; until then a match can still win
//! - in phrase mode, exhausted output without a match resolves the run even
//!   if the process is still alive

use std::time::Duration;

use super::{RunEvent, RunOutcome};

/// Command produced by the core, to be executed by the outer IO shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunCommand {
    /// Raise the run's cancellation signal so scanners stop.
    CancelScanners,
    /// Best-effort kill of the child process.
    KillProcess,
    /// Arm the post-exit drain deadline.
    StartDrain,
}

/// Decision returned by the core after handling a single `RunEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoreStep {
    pub commands: Vec<RunCommand>,
    /// Set on the one step that resolves the run.
    pub outcome: Option<RunOutcome>,
}

impl CoreStep {
    fn pending(commands: Vec<RunCommand>) -> Self {
        Self {
            commands,
            outcome: None,
        }
    }

    fn resolved(outcome: RunOutcome, commands: Vec<RunCommand>) -> Self {
        Self {
            commands,
            outcome: Some(outcome),
        }
    }
}

/// Per-run core state.
#[derive(Debug, Clone)]
pub struct DetectionCore {
    phrase_mode: bool,
    exited_after: Option<Duration>,
    output_exhausted: bool,
    outcome: Option<RunOutcome>,
}

impl DetectionCore {
    pub fn new(phrase_mode: bool) -> Self {
        Self {
            phrase_mode,
            exited_after: None,
            output_exhausted: false,
            outcome: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    /// Handle a single event, updating state and returning the resulting
    /// commands. Events after resolution are ignored.
    pub fn step(&mut self, event: RunEvent) -> CoreStep {
        if self.outcome.is_some() {
            return CoreStep::default();
        }

        let step = match event {
            RunEvent::PhraseMatched(elapsed) => self.on_match(elapsed),
            RunEvent::TimedOut => self.on_timeout(),
            RunEvent::ProcessExited(elapsed) => self.on_exit(elapsed),
            RunEvent::OutputExhausted => self.on_output_exhausted(),
            RunEvent::DrainElapsed => self.on_drain_elapsed(),
        };

        if let Some(outcome) = step.outcome {
            self.outcome = Some(outcome);
        }
        step
    }

    fn on_match(&mut self, elapsed: Duration) -> CoreStep {
        if !self.phrase_mode {
            return CoreStep::default();
        }
        let mut commands = vec![RunCommand::CancelScanners];
        if self.exited_after.is_none() {
            commands.push(RunCommand::KillProcess);
        }
        CoreStep::resolved(RunOutcome::Matched(elapsed), commands)
    }

    fn on_timeout(&mut self) -> CoreStep {
        // Exit already observed: the timeout lost the race, we are only
        // waiting for trailing output.
        if self.exited_after.is_some() {
            return self.confirm_exit();
        }
        CoreStep::resolved(
            RunOutcome::TimedOut,
            vec![RunCommand::CancelScanners, RunCommand::KillProcess],
        )
    }

    fn on_exit(&mut self, elapsed: Duration) -> CoreStep {
        self.exited_after = Some(elapsed);
        if self.output_exhausted {
            self.confirm_exit()
        } else {
            CoreStep::pending(vec![RunCommand::StartDrain])
        }
    }

    fn on_output_exhausted(&mut self) -> CoreStep {
        self.output_exhausted = true;
        if self.exited_after.is_some() {
            return self.confirm_exit();
        }
        if self.phrase_mode {
            // Nothing left to read, the phrase can no longer appear.
            return CoreStep::resolved(
                RunOutcome::NoMatch,
                vec![RunCommand::CancelScanners, RunCommand::KillProcess],
            );
        }
        CoreStep::default()
    }

    fn on_drain_elapsed(&mut self) -> CoreStep {
        if self.exited_after.is_some() {
            self.confirm_exit()
        } else {
            CoreStep::default()
        }
    }

    fn confirm_exit(&self) -> CoreStep {
        let outcome = match (self.phrase_mode, self.exited_after) {
            (false, Some(elapsed)) => RunOutcome::Completed(elapsed),
            _ => RunOutcome::NoMatch,
        };
        CoreStep::resolved(outcome, vec![RunCommand::CancelScanners])
    }
}
