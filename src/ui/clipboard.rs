// src/ui/clipboard.rs

//! Results export for the interactive view.
//!
//! The summary is copied through an OSC 52 escape sequence written to
//! stderr, which most terminals (and tmux/screen with passthrough) turn into
//! a clipboard write. Nothing is read back, so success cannot be confirmed.

use std::io::{self, Write};
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};

use crate::config::BenchConfig;
use crate::output::format_duration;
use crate::stats::{compute_statistics, std_deviation};
use crate::types::RunResult;

/// screen limits the length of a DCS string; longer payloads are split.
const SCREEN_CHUNK: usize = 76;

/// Terminal multiplexer the sequence has to be wrapped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplexer {
    None,
    Tmux,
    Screen,
}

impl Multiplexer {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("TMUX").ok().as_deref(),
            std::env::var("TERM").ok().as_deref(),
        )
    }

    /// Decide from the values of `$TMUX` and `$TERM`.
    pub fn from_vars(tmux: Option<&str>, term: Option<&str>) -> Self {
        if tmux.is_some_and(|v| !v.is_empty()) {
            Multiplexer::Tmux
        } else if term.is_some_and(|v| v.contains("screen")) {
            Multiplexer::Screen
        } else {
            Multiplexer::None
        }
    }
}

/// Plain-text results as placed on the clipboard.
///
/// ```text
/// sleep 1
/// Mean: 1.002s ± 0.001s
/// Range: 1.001s … 1.004s
/// ```
pub fn results_summary(config: &BenchConfig, results: &[RunResult]) -> String {
    let valid: Vec<Duration> = results
        .iter()
        .filter(|r| r.found)
        .map(|r| r.duration)
        .collect();
    let failed = results.len() - valid.len();

    let mut text = config.display_command();
    text.push('\n');

    match valid.as_slice() {
        [] => {
            text.push_str(if config.is_phrase_mode() {
                "No successful runs - phrase not found"
            } else {
                "No successful runs - all executions timed out"
            });
        }
        [only] => {
            text.push_str(&format!("Time: {}", format_duration(*only)));
            if failed > 0 {
                text.push_str(&format!(" ({failed} failed)"));
            }
        }
        _ => {
            let stats = compute_statistics(&valid);
            let spread = std_deviation(&valid, stats.mean);
            text.push_str(&format!(
                "Mean: {} ± {}",
                format_duration(stats.mean),
                format_duration(spread)
            ));
            if failed > 0 {
                text.push_str(&format!(" ({}/{} completed)", valid.len(), results.len()));
            }
            text.push_str(&format!(
                "\nRange: {} … {}",
                format_duration(stats.min),
                format_duration(stats.max)
            ));
        }
    }
    text
}

/// OSC 52 "set system clipboard" sequence for `text`.
pub fn osc52_sequence(text: &str, mux: Multiplexer) -> String {
    let seq = format!("\x1b]52;c;{}\x07", B64.encode(text));
    match mux {
        Multiplexer::None => seq,
        Multiplexer::Tmux => format!("\x1bPtmux;{}\x1b\\", seq.replace('\x1b', "\x1b\x1b")),
        Multiplexer::Screen => {
            let chunks: Vec<&str> = seq
                .as_bytes()
                .chunks(SCREEN_CHUNK)
                .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
                .collect();
            format!("\x1bP{}\x1b\\", chunks.join("\x1b\\\x1bP"))
        }
    }
}

/// Write the clipboard sequence for `text` to `out`.
pub fn copy_to<W: Write>(out: &mut W, text: &str, mux: Multiplexer) -> io::Result<()> {
    out.write_all(osc52_sequence(text, mux).as_bytes())?;
    out.flush()
}
