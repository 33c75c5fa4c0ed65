// src/engine/mod.rs

//! Detection engine shared by batch runs and streaming sessions.
//!
//! A single run races several event sources: the phrase showing up in the
//! output, the timeout, the process exiting, the output running dry and the
//! post-exit drain deadline. The pure state machine that decides what each
//! event means lives in [`core`]; the async shell that owns the process and
//! turns Tokio readiness into [`RunEvent`]s is [`runtime`].

use std::time::Duration;

use crate::types::RunResult;

/// Events flowing into the detection core from one run.
///
/// Variants are listed in priority order: when several sources are ready in
/// the same poll, the runtime reports the earlier one first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// A scanner saw the phrase this long after launch.
    PhraseMatched(Duration),
    /// The configured timeout elapsed.
    TimedOut,
    /// The process exit status was observed this long after launch.
    ProcessExited(Duration),
    /// Every output stream reached end-of-data (or failed).
    OutputExhausted,
    /// The grace period after an observed exit ran out.
    DrainElapsed,
}

/// How a run ended, before shell overhead is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Phrase mode: first match after this long.
    Matched(Duration),
    /// Completion mode: process exited after this long.
    Completed(Duration),
    /// Timeout won the race.
    TimedOut,
    /// Phrase mode: the process or its output ended without a match.
    NoMatch,
}

impl RunOutcome {
    /// Apply shell overhead and collapse into the public result shape.
    pub fn into_result(self, shell_overhead: Duration) -> RunResult {
        match self {
            RunOutcome::Matched(elapsed) | RunOutcome::Completed(elapsed) => {
                RunResult::measured(elapsed, shell_overhead)
            }
            RunOutcome::TimedOut | RunOutcome::NoMatch => RunResult::not_found(),
        }
    }

    pub fn is_match(self) -> bool {
        matches!(self, RunOutcome::Matched(_))
    }
}

pub mod core;
pub mod runtime;

pub use self::core::{CoreStep, DetectionCore, RunCommand};
pub use self::runtime::{EXIT_DRAIN_GRACE, LaunchedRun};
