// src/exec/backend.rs

//! Pluggable process-launch abstraction.
//!
//! The detection runtime talks to a `ProcessLauncher` instead of calling
//! `tokio::process::Command` directly. This keeps the race logic independent
//! of real processes so tests can feed scripted output streams.
//!
//! - `TokioLauncher` is the default implementation used by `chrono`.
//! - Tests can provide their own launcher whose "process" is a pair of
//!   in-memory readers and a controllable exit.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::AsyncRead;
use tokio::process::{Child, Command};

/// Readable end of a child's stdout or stderr.
pub type OutputStream = Pin<Box<dyn AsyncRead + Send>>;

/// A started process: its output streams plus a handle to wait on or kill it.
pub struct LaunchedProcess {
    pub stdout: Option<OutputStream>,
    pub stderr: Option<OutputStream>,
    pub handle: Box<dyn ProcessHandle>,
}

/// Control over a running process.
pub trait ProcessHandle: Send {
    /// Wait for the process to exit and return its exit code, if any.
    ///
    /// Must be cancel-safe: the runtime polls it inside a `select!` loop.
    fn wait(&mut self) -> Pin<Box<dyn Future<Output = io::Result<Option<i32>>> + Send + '_>>;

    /// Ask the process to terminate without waiting for it.
    ///
    /// Errors for processes that already exited are expected and ignored by
    /// callers.
    fn start_kill(&mut self) -> io::Result<()>;

    /// OS process id, when there is one.
    fn id(&self) -> Option<u32>;
}

/// Trait abstracting how target commands are started.
///
/// Production code uses [`TokioLauncher`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ProcessLauncher: Send + Sync {
    /// Start `program` with `args`, with stdout and stderr captured.
    fn launch(&self, program: &str, args: &[String]) -> io::Result<LaunchedProcess>;
}

/// Real launcher used in production, backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioLauncher;

impl ProcessLauncher for TokioLauncher {
    fn launch(&self, program: &str, args: &[String]) -> io::Result<LaunchedProcess> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn()?;

        let stdout = child
            .stdout
            .take()
            .map(|s| Box::pin(s) as OutputStream);
        let stderr = child
            .stderr
            .take()
            .map(|s| Box::pin(s) as OutputStream);

        Ok(LaunchedProcess {
            stdout,
            stderr,
            handle: Box::new(TokioChild { child }),
        })
    }
}

struct TokioChild {
    child: Child,
}

impl ProcessHandle for TokioChild {
    fn wait(&mut self) -> Pin<Box<dyn Future<Output = io::Result<Option<i32>>> + Send + '_>> {
        Box::pin(async move {
            let status = self.child.wait().await?;
            Ok(status.code())
        })
    }

    fn start_kill(&mut self) -> io::Result<()> {
        self.child.start_kill()
    }

    fn id(&self) -> Option<u32> {
        self.child.id()
    }
}
