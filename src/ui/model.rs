// src/ui/model.rs

//! State of the interactive view, independent of any terminal.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::BenchConfig;
use crate::output::format_duration;
use crate::stats::compute_statistics;
use crate::types::{OutputLine, RunResult};

/// Output lines kept for scrolling; older lines are discarded.
pub const OUTPUT_HISTORY: usize = 5_000;

/// Where the benchmark sequence currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Calibrating,
    Warmup,
    Benchmarking,
    Completed,
}

/// How long the "copied" notice replaces the shortcut line.
pub const CLIPBOARD_FEEDBACK: Duration = Duration::from_secs(3);

/// Lines moved per mouse-wheel notch.
pub const SCROLL_STEPS: usize = 3;

/// One row of the output panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewLine {
    /// A line produced by the command (or the match marker).
    Output(OutputLine),
    /// Header written before each measured run.
    RunHeader(usize),
    Blank,
}

impl fmt::Display for ViewLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewLine::Output(line) => fmt::Display::fmt(line, f),
            ViewLine::RunHeader(number) => write!(f, "--- Benchmark Run {number} ---"),
            ViewLine::Blank => Ok(()),
        }
    }
}

/// Kind of the run currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Warmup,
    Measured,
}

#[derive(Debug)]
pub struct UiModel {
    config: BenchConfig,
    phase: Phase,
    overhead: Duration,
    warmup_results: Vec<RunResult>,
    results: Vec<RunResult>,
    run_started: Option<Instant>,
    elapsed: Duration,
    output: VecDeque<ViewLine>,
    /// Lines scrolled up from the bottom; zero follows new output.
    scroll_back: usize,
    dropped_lines: u64,
    calibration_degraded: bool,
    copied_until: Option<Instant>,
    error: Option<String>,
}

impl UiModel {
    pub fn new(config: BenchConfig) -> Self {
        let phase = if !config.skip_calibration {
            Phase::Calibrating
        } else if config.warmups > 0 {
            Phase::Warmup
        } else {
            Phase::Benchmarking
        };
        Self {
            config,
            phase,
            overhead: Duration::ZERO,
            warmup_results: Vec::new(),
            results: Vec::new(),
            run_started: None,
            elapsed: Duration::ZERO,
            output: VecDeque::new(),
            scroll_back: 0,
            dropped_lines: 0,
            calibration_degraded: false,
            copied_until: None,
            error: None,
        }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn overhead(&self) -> Duration {
        self.overhead
    }

    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    pub fn warmup_results(&self) -> &[RunResult] {
        &self.warmup_results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.run_started.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn dropped_lines(&self) -> u64 {
        self.dropped_lines
    }

    /// Warning shown while the shell overhead could not be measured.
    pub fn calibration_warning(&self) -> Option<&'static str> {
        self.calibration_degraded
            .then_some("Warning: shell calibration failed, no overhead subtracted")
    }

    /// `degraded` is set when no calibration sample succeeded.
    pub fn calibration_done(&mut self, overhead: Duration, degraded: bool) {
        self.overhead = overhead;
        self.calibration_degraded = degraded;
        self.phase = if self.config.warmups > 0 {
            Phase::Warmup
        } else {
            Phase::Benchmarking
        };
    }

    /// The kind of run that should start next, or `None` once every run has
    /// finished (or the sequence stopped on an error).
    pub fn next_run(&self) -> Option<RunKind> {
        if self.error.is_some() {
            return None;
        }
        match self.phase {
            Phase::Calibrating | Phase::Completed => None,
            Phase::Warmup => Some(RunKind::Warmup),
            Phase::Benchmarking => Some(RunKind::Measured),
        }
    }

    pub fn begin_run(&mut self, kind: RunKind, now: Instant) {
        self.run_started = Some(now);
        self.elapsed = Duration::ZERO;
        if kind == RunKind::Measured {
            let number = self.results.len() + 1;
            self.push_view_line(ViewLine::Blank);
            self.push_view_line(ViewLine::RunHeader(number));
            self.push_view_line(ViewLine::Blank);
        }
    }

    pub fn push_line(&mut self, line: &OutputLine) {
        self.push_view_line(ViewLine::Output(line.clone()));
    }

    pub fn finish_run(&mut self, kind: RunKind, result: RunResult, dropped_lines: u64) {
        self.run_started = None;
        self.dropped_lines += dropped_lines;
        match kind {
            RunKind::Warmup => {
                self.warmup_results.push(result);
                if self.warmup_results.len() >= self.config.warmups as usize {
                    self.phase = Phase::Benchmarking;
                }
            }
            RunKind::Measured => {
                self.results.push(result);
                if self.results.len() >= self.config.runs as usize {
                    self.phase = Phase::Completed;
                }
            }
        }
    }

    /// Record a fatal error; no further runs are started.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.run_started = None;
        self.error = Some(message.into());
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(started) = self.run_started {
            self.elapsed = now.saturating_duration_since(started);
        }
        if self.copied_until.is_some_and(|until| now >= until) {
            self.copied_until = None;
        }
    }

    /// Results can be exported once every measured run has finished.
    pub fn can_copy_results(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn note_copied(&mut self, now: Instant) {
        self.copied_until = Some(now + CLIPBOARD_FEEDBACK);
    }

    fn push_view_line(&mut self, line: ViewLine) {
        if self.output.len() == OUTPUT_HISTORY {
            self.output.pop_front();
        }
        self.output.push_back(line);
        if self.scroll_back > 0 {
            // Keep the viewport on the same lines while new output arrives.
            self.scroll_back = (self.scroll_back + 1).min(self.output.len());
        }
    }

    pub fn scroll_up(&mut self, lines: usize, view_height: usize) {
        let max = self.output.len().saturating_sub(view_height);
        self.scroll_back = (self.scroll_back + lines).min(max);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    /// Esc: jump to the bottom, or to the top when already at the bottom.
    pub fn toggle_scroll_end(&mut self, view_height: usize) {
        if self.scroll_back == 0 {
            self.scroll_back = self.output.len().saturating_sub(view_height);
        } else {
            self.scroll_back = 0;
        }
    }

    pub fn is_following(&self) -> bool {
        self.scroll_back == 0
    }

    /// The output lines that fit in a viewport of `height` rows.
    pub fn visible_output(&self, height: usize) -> Vec<&ViewLine> {
        let len = self.output.len();
        let end = len.saturating_sub(self.scroll_back);
        let start = end.saturating_sub(height);
        self.output.range(start..end).collect()
    }

    pub fn status_line(&self) -> String {
        match self.phase {
            Phase::Calibrating => "Status: Calibrating".to_string(),
            Phase::Warmup => format!(
                "Status: Warmup ({}/{})",
                (self.warmup_results.len() + 1).min(self.config.warmups as usize),
                self.config.warmups
            ),
            Phase::Benchmarking => format!(
                "Status: Benchmarking ({}/{})",
                (self.results.len() + 1).min(self.config.runs as usize),
                self.config.runs
            ),
            Phase::Completed => "Status: Completed".to_string(),
        }
    }

    /// Configuration block of the left panel.
    pub fn config_lines(&self) -> Vec<String> {
        let timeout = match self.config.timeout_limit() {
            Some(limit) => format!("{limit:?}"),
            None => "none".to_string(),
        };
        let mut lines = vec![
            format!("Warmups: {}", self.config.warmups),
            format!("Runs: {}", self.config.runs),
            format!("Timeout: {timeout}"),
        ];
        if !self.config.skip_calibration {
            lines.push(format!("Shell overhead: {}", format_duration(self.overhead)));
        }
        lines
    }

    /// Per-run timings and, once completed, the final statistics.
    pub fn timing_lines(&self) -> Vec<String> {
        let mut lines = vec!["Run Timings:".to_string()];
        for (i, result) in self.warmup_results.iter().enumerate() {
            lines.push(format!("  W{}: {}", i + 1, result_label(result)));
        }
        for (i, result) in self.results.iter().enumerate() {
            lines.push(format!("  #{}: {}", i + 1, result_label(result)));
        }
        if self.is_running() {
            lines.push(format!("  ...  {}", format_duration(self.elapsed)));
        }

        if self.phase == Phase::Completed {
            let valid: Vec<Duration> = self
                .results
                .iter()
                .filter(|r| r.found)
                .map(|r| r.duration)
                .collect();
            if valid.len() > 1 {
                let stats = compute_statistics(&valid);
                lines.push(String::new());
                lines.push("Final Results:".to_string());
                lines.push(format!("  Mean: {}", format_duration(stats.mean)));
                lines.push(format!("  Min: {}", format_duration(stats.min)));
                lines.push(format!("  Max: {}", format_duration(stats.max)));
                lines.push(format!("  Range: {}", format_duration(stats.range)));
            }
        }
        lines
    }

    pub fn shortcuts(&self) -> &'static str {
        if self.copied_until.is_some() {
            "Results copied to clipboard!"
        } else {
            "↑/↓ j/k: scroll • Esc: top/bottom • y: copy results • q/Ctrl+C: quit"
        }
    }
}

fn result_label(result: &RunResult) -> String {
    if result.found {
        format_duration(result.duration)
    } else {
        "timeout".to_string()
    }
}
