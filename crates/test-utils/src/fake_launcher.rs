use std::future::{Future, pending};
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::io::{AsyncWriteExt, duplex};
use tokio::sync::watch;
use tokio::time::{Instant, sleep, sleep_until};

use chrono_bench::exec::{LaunchedProcess, OutputStream, ProcessHandle, ProcessLauncher};

/// One step of a scripted process.
#[derive(Debug, Clone)]
pub enum Step {
    /// Write a line (newline appended) to stdout.
    Stdout(String),
    /// Write a line (newline appended) to stderr.
    Stderr(String),
    /// Raw bytes to stdout, written as-is.
    StdoutRaw(Vec<u8>),
    Sleep(Duration),
}

/// When the fake process exits on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// As soon as the script has been written.
    AfterScript,
    /// A fixed time after launch, independent of the script.
    After(Duration),
    /// Only when killed.
    Never,
}

/// Counters shared between a launcher and every process it started.
#[derive(Debug, Default)]
pub struct LaunchStats {
    pub launches: AtomicUsize,
    pub kills: AtomicUsize,
}

impl LaunchStats {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn kills(&self) -> usize {
        self.kills.load(Ordering::SeqCst)
    }
}

/// A launcher whose "process" writes a fixed script into in-memory pipes.
///
/// - stdout/stderr reach EOF once the script is done, unless
///   [`hold_output_open`](Self::hold_output_open) is set; a kill always
///   closes them.
/// - `wait()` resolves per [`Exit`], or with `None` once killed.
#[derive(Debug, Clone)]
pub struct ScriptedLauncher {
    script: Vec<Step>,
    exit: Exit,
    exit_code: i32,
    hold_output_open: bool,
    fail_launch: bool,
    stats: Arc<LaunchStats>,
}

impl ScriptedLauncher {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script,
            exit: Exit::AfterScript,
            exit_code: 0,
            hold_output_open: false,
            fail_launch: false,
            stats: Arc::new(LaunchStats::default()),
        }
    }

    /// A launcher whose every launch fails with `NotFound`.
    pub fn failing() -> Self {
        let mut launcher = Self::new(Vec::new());
        launcher.fail_launch = true;
        launcher
    }

    pub fn exit(mut self, exit: Exit) -> Self {
        self.exit = exit;
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Keep stdout/stderr open after the script until the process is killed.
    pub fn hold_output_open(mut self) -> Self {
        self.hold_output_open = true;
        self
    }

    pub fn stats(&self) -> Arc<LaunchStats> {
        Arc::clone(&self.stats)
    }
}

impl ProcessLauncher for ScriptedLauncher {
    fn launch(&self, program: &str, _args: &[String]) -> io::Result<LaunchedProcess> {
        if self.fail_launch {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such program: {program}"),
            ));
        }
        self.stats.launches.fetch_add(1, Ordering::SeqCst);

        let (mut out_w, out_r) = duplex(64 * 1024);
        let (mut err_w, err_r) = duplex(64 * 1024);
        let (kill_tx, kill_rx) = watch::channel(false);
        let (done_tx, done_rx) = watch::channel(false);

        let script = self.script.clone();
        let hold_open = self.hold_output_open;
        let mut writer_kill_rx = kill_rx.clone();

        tokio::spawn(async move {
            let write_script = async {
                for step in script {
                    let res = match step {
                        Step::Stdout(line) => out_w.write_all(format!("{line}\n").as_bytes()).await,
                        Step::Stderr(line) => err_w.write_all(format!("{line}\n").as_bytes()).await,
                        Step::StdoutRaw(bytes) => out_w.write_all(&bytes).await,
                        Step::Sleep(d) => {
                            sleep(d).await;
                            Ok(())
                        }
                    };
                    if res.is_err() {
                        break;
                    }
                }
                done_tx.send_replace(true);
                if hold_open {
                    pending::<()>().await;
                }
            };

            tokio::select! {
                _ = write_script => {}
                _ = wait_true(&mut writer_kill_rx) => {}
            }
            // Writers drop here: readers see EOF.
        });

        let exit_at = match self.exit {
            Exit::After(d) => Some(Instant::now() + d),
            Exit::AfterScript | Exit::Never => None,
        };

        Ok(LaunchedProcess {
            stdout: Some(Box::pin(out_r) as OutputStream),
            stderr: Some(Box::pin(err_r) as OutputStream),
            handle: Box::new(FakeProcess {
                exit: self.exit,
                exit_code: self.exit_code,
                exit_at,
                script_done: done_rx,
                killed: kill_rx,
                kill_tx,
                stats: Arc::clone(&self.stats),
            }),
        })
    }
}

struct FakeProcess {
    exit: Exit,
    exit_code: i32,
    exit_at: Option<Instant>,
    script_done: watch::Receiver<bool>,
    killed: watch::Receiver<bool>,
    kill_tx: watch::Sender<bool>,
    stats: Arc<LaunchStats>,
}

impl ProcessHandle for FakeProcess {
    fn wait(&mut self) -> Pin<Box<dyn Future<Output = io::Result<Option<i32>>> + Send + '_>> {
        let FakeProcess {
            exit,
            exit_code,
            exit_at,
            script_done,
            killed,
            ..
        } = self;
        let (exit, code, exit_at) = (*exit, *exit_code, *exit_at);

        Box::pin(async move {
            let natural = async {
                match exit {
                    Exit::AfterScript => wait_true(script_done).await,
                    Exit::After(_) => match exit_at {
                        Some(at) => sleep_until(at).await,
                        None => pending::<()>().await,
                    },
                    Exit::Never => pending::<()>().await,
                }
            };

            tokio::select! {
                biased;
                _ = wait_true(killed) => Ok(None),
                _ = natural => Ok(Some(code)),
            }
        })
    }

    fn start_kill(&mut self) -> io::Result<()> {
        self.stats.kills.fetch_add(1, Ordering::SeqCst);
        self.kill_tx.send_replace(true);
        Ok(())
    }

    fn id(&self) -> Option<u32> {
        None
    }
}

/// Resolve once the watched flag is `true`; pend forever if the sender is
/// gone while it is still `false`.
async fn wait_true(rx: &mut watch::Receiver<bool>) {
    loop {
        let set = *rx.borrow_and_update();
        if set {
            return;
        }
        if rx.changed().await.is_err() {
            pending::<()>().await;
        }
    }
}
