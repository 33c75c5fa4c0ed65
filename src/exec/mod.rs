// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the benchmarked command,
//! using `tokio::process::Command`, and for turning its output into phrase
//! matches and live lines.
//!
//! - [`backend`] provides the `ProcessLauncher` trait and the concrete
//!   `TokioLauncher` used in production, which tests can replace.
//! - [`scanner`] reads one output stream line by line and reports matches.
//! - [`lines`] delivers lines to a live consumer without blocking.
//! - [`runner`] is the batch entry point (`run_once`).
//! - [`session`] is the streaming entry point (`StreamingSession`).
//!
//! Both entry points delegate the actual race to
//! [`LaunchedRun::detect`](crate::engine::LaunchedRun::detect).

pub mod backend;
pub mod lines;
pub mod runner;
pub mod scanner;
pub mod session;

pub use backend::{LaunchedProcess, OutputStream, ProcessHandle, ProcessLauncher, TokioLauncher};
pub use lines::{LINE_BUFFER, LineSink};
pub use runner::{run_once, run_once_with};
pub use scanner::{ScanContext, ScanOutcome, scan_stream};
pub use session::{SessionEvent, StreamingSession};
