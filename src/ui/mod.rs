// src/ui/mod.rs

//! Interactive terminal view (the default mode).
//!
//! Runs the same sequence as the batch driver (calibrate, warmups, measured
//! runs) but drives each run through a [`StreamingSession`] so the command's
//! output shows up live in the right-hand panel. When the user quits, the
//! terminal is restored and, if every run finished, the summary is printed
//! to stdout with the regular [`Printer`]. Once the runs are done, `y`
//! copies a short summary to the clipboard.

pub mod clipboard;
pub mod model;
pub mod render;
pub mod terminal;

use std::io;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::config::BenchConfig;
use crate::driver::BenchDriver;
use crate::errors::{ChronoError, Result};
use crate::exec::{SessionEvent, StreamingSession};
use crate::output::Printer;

pub use model::{Phase, RunKind, SCROLL_STEPS, UiModel, ViewLine};
pub use terminal::InputEvent;

use self::clipboard::{Multiplexer, copy_to, results_summary};
use self::render::{draw_frame, output_panel_column, output_view_height};
use self::terminal::{ChronoTerminal, InputReader, TerminalGuard, setup_terminal};

/// Redraw cadence; also drives the elapsed-time display.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// What an input event asks the loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    CopyResults,
}

/// Apply a key press to the model.
pub fn handle_key(model: &mut UiModel, key: KeyEvent, view_height: usize) -> KeyAction {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('y') if model.can_copy_results() => KeyAction::CopyResults,
        KeyCode::Up | KeyCode::Char('k') => {
            model.scroll_up(1, view_height);
            KeyAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            model.scroll_down(1);
            KeyAction::None
        }
        KeyCode::PageUp => {
            model.scroll_up(view_height.max(1), view_height);
            KeyAction::None
        }
        KeyCode::PageDown => {
            model.scroll_down(view_height.max(1));
            KeyAction::None
        }
        KeyCode::Esc => {
            model.toggle_scroll_end(view_height);
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Apply a terminal input event. Wheel scrolling only counts over the output
/// panel, which starts at `output_column`.
pub fn handle_input(
    model: &mut UiModel,
    input: InputEvent,
    output_column: u16,
    view_height: usize,
) -> KeyAction {
    match input {
        InputEvent::Key(key) => handle_key(model, key, view_height),
        InputEvent::Wheel { column, .. } if column < output_column => KeyAction::None,
        InputEvent::Wheel { up: true, .. } => {
            model.scroll_up(SCROLL_STEPS, view_height);
            KeyAction::None
        }
        InputEvent::Wheel { up: false, .. } => {
            model.scroll_down(SCROLL_STEPS);
            KeyAction::None
        }
    }
}

/// Run the whole benchmark inside the interactive view.
pub async fn run_interactive(config: &BenchConfig, driver: &BenchDriver) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let guard = TerminalGuard;
    let mut input = InputReader::spawn();

    let mut view = InteractiveView {
        model: UiModel::new(config.clone()),
        terminal: &mut terminal,
        launch_error: None,
    };
    let quit_early = view.drive(config, driver, &mut input).await?;
    let InteractiveView {
        model,
        launch_error,
        ..
    } = view;

    drop(input);
    drop(guard);

    if let Some(err) = launch_error {
        return Err(err);
    }
    if quit_early {
        info!(
            completed = model.results().len(),
            runs = config.runs,
            "benchmark interrupted"
        );
        return Ok(());
    }

    let mut printer = Printer::stdout();
    printer.print_summary(model.results(), config, model.overhead())?;
    printer.flush()?;
    Ok(())
}

struct InteractiveView<'t> {
    model: UiModel,
    terminal: &'t mut ChronoTerminal,
    launch_error: Option<ChronoError>,
}

impl InteractiveView<'_> {
    /// Returns `true` if the user quit before every run finished.
    async fn drive(
        &mut self,
        config: &BenchConfig,
        driver: &BenchDriver,
        input: &mut InputReader,
    ) -> Result<bool> {
        let mut ticker = interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.draw()?;

        if self.model.phase() == Phase::Calibrating {
            let calibration = driver.calibrate(config);
            tokio::pin!(calibration);
            loop {
                tokio::select! {
                    report = &mut calibration => {
                        let (overhead, degraded) = report
                            .map(|r| (r.overhead, r.is_degraded()))
                            .unwrap_or_default();
                        self.model.calibration_done(overhead, degraded);
                        break;
                    }
                    Some(event) = input.events.recv() => {
                        if self.on_input(event)? == KeyAction::Quit {
                            return Ok(true);
                        }
                    }
                    _ = ticker.tick() => self.draw()?,
                }
            }
            self.draw()?;
        }

        while let Some(kind) = self.model.next_run() {
            let mut session =
                match StreamingSession::start_with(driver.launcher(), config, self.model.overhead())
                {
                    Ok(session) => session,
                    Err(err) => {
                        self.model.fail(err.to_string());
                        self.launch_error = Some(err);
                        break;
                    }
                };
            self.model.begin_run(kind, Instant::now());

            loop {
                tokio::select! {
                    event = session.next_event() => match event {
                        Some(SessionEvent::Line(line)) => self.model.push_line(&line),
                        Some(SessionEvent::Finished(result)) => {
                            debug!(?kind, found = result.found, duration = ?result.duration, "run finished");
                            self.model.finish_run(kind, result, session.dropped_lines());
                            break;
                        }
                        None => break,
                    },
                    Some(event) = input.events.recv() => {
                        if self.on_input(event)? == KeyAction::Quit {
                            session.cancel();
                            return Ok(true);
                        }
                    }
                    _ = ticker.tick() => {
                        self.model.tick(Instant::now());
                        self.draw()?;
                    }
                }
            }
            self.draw()?;
        }

        // Keep the results on screen until the user leaves.
        loop {
            tokio::select! {
                event = input.events.recv() => match event {
                    Some(event) => {
                        if self.on_input(event)? == KeyAction::Quit {
                            return Ok(self.model.phase() != Phase::Completed);
                        }
                    }
                    None => return Ok(self.model.phase() != Phase::Completed),
                },
                _ = ticker.tick() => {
                    self.model.tick(Instant::now());
                    self.draw()?;
                }
            }
        }
    }

    fn on_input(&mut self, event: InputEvent) -> Result<KeyAction> {
        let size = self.terminal.size()?;
        let column = output_panel_column(&self.model, size.width);
        let action = handle_input(&mut self.model, event, column, output_view_height(size.height));
        if action == KeyAction::CopyResults {
            self.copy_results();
        }
        self.draw()?;
        Ok(action)
    }

    fn copy_results(&mut self) {
        let text = results_summary(self.model.config(), self.model.results());
        match copy_to(&mut io::stderr(), &text, Multiplexer::from_env()) {
            Ok(()) => self.model.note_copied(Instant::now()),
            Err(err) => debug!(error = %err, "writing clipboard sequence failed"),
        }
    }

    fn draw(&mut self) -> Result<()> {
        let model = &self.model;
        self.terminal.draw(|f| draw_frame(f, model))?;
        Ok(())
    }
}
