// src/ui/terminal.rs

//! Terminal setup and teardown for the interactive view.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::debug;

pub type ChronoTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Input the interactive loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Mouse wheel movement at the given column.
    Wheel { column: u16, up: bool },
}

impl InputEvent {
    /// Key presses and wheel scrolls; everything else is ignored.
    fn from_terminal(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(InputEvent::Key(key)),
            Event::Mouse(MouseEvent { kind, column, .. }) => match kind {
                MouseEventKind::ScrollUp => Some(InputEvent::Wheel { column, up: true }),
                MouseEventKind::ScrollDown => Some(InputEvent::Wheel { column, up: false }),
                _ => None,
            },
            _ => None,
        }
    }
}

/// How long the input reader blocks in `event::poll` before checking for stop.
const KEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Raw mode + alternate screen + mouse capture. Undone by [`cleanup`] (or [`TerminalGuard`]).
pub fn setup_terminal() -> io::Result<ChronoTerminal> {
    enable_raw_mode()?;
    if let Err(err) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
        disable_raw_mode().ok();
        return Err(err);
    }

    let backend = CrosstermBackend::new(io::stdout());
    match Terminal::new(backend) {
        Ok(mut terminal) => {
            if let Err(err) = terminal.clear() {
                cleanup();
                return Err(err);
            }
            Ok(terminal)
        }
        Err(err) => {
            cleanup();
            Err(err)
        }
    }
}

pub fn cleanup() {
    disable_raw_mode().ok();
    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen).ok();
}

/// Restores the terminal when dropped, including on early return or panic
/// unwinding.
pub struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        cleanup();
    }
}

/// Reads terminal input on a blocking thread and forwards it.
///
/// The thread exits when the reader is dropped or the receiver goes away.
pub struct InputReader {
    pub events: mpsc::Receiver<InputEvent>,
    stop: Arc<AtomicBool>,
}

impl InputReader {
    pub fn spawn() -> Self {
        let (tx, events) = mpsc::channel(32);
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        tokio::task::spawn_blocking(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                match event::poll(KEY_POLL_INTERVAL) {
                    Ok(true) => match event::read() {
                        Ok(event) => {
                            let Some(input) = InputEvent::from_terminal(event) else {
                                continue;
                            };
                            if tx.blocking_send(input).is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            debug!(error = %err, "reading terminal event failed");
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(err) => {
                        debug!(error = %err, "polling terminal events failed");
                        break;
                    }
                }
            }
        });

        Self { events, stop }
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
