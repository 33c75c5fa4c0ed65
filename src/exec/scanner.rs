// src/exec/scanner.rs

//! Per-stream output scanner.
//!
//! One scanner runs per child stream (stdout, stderr). Each reads
//! line-by-line, forwards lines to an optional [`LineSink`] and, in phrase
//! mode, reports the first line containing the phrase through a single-slot
//! channel. All scanners of a run share one `CancellationToken`; once it is
//! cancelled they stop at their next read and drop their stream handle.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::exec::lines::LineSink;
use crate::types::{OutputLine, StreamKind};

/// How a scanner finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// This scanner saw the phrase (and attempted to report it).
    Matched,
    /// End-of-data reached without a match.
    Exhausted,
    /// Stopped because the run was cancelled.
    Cancelled,
    /// Reading the stream failed.
    Failed,
}

/// Everything a scanner needs besides the stream itself.
#[derive(Debug, Clone)]
pub struct ScanContext {
    /// `None` in completion mode: lines are only drained and forwarded.
    pub phrase: Option<Arc<str>>,
    /// Launch timestamp of the run; match times are measured from here.
    pub start: Instant,
    /// Single-slot channel for "phrase found after this long".
    pub match_tx: mpsc::Sender<Duration>,
    pub cancel: CancellationToken,
    pub sink: Option<LineSink>,
}

/// Scan `reader` until match, end-of-data, error or cancellation.
///
/// Cancellation is checked before every read and again before every line is
/// handled, so a cancelled scanner never reports a match even if the phrase
/// is already sitting in unread input.
pub async fn scan_stream<R>(reader: R, stream: StreamKind, ctx: ScanContext) -> ScanOutcome
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::with_capacity(256);

    loop {
        buf.clear();

        let read = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {
                trace!(stream = stream.as_str(), "scanner cancelled while waiting for input");
                return ScanOutcome::Cancelled;
            }
            res = reader.read_until(b'\n', &mut buf) => res,
        };

        match read {
            Ok(0) => {
                debug!(stream = stream.as_str(), "scanner reached end of stream");
                return ScanOutcome::Exhausted;
            }
            Ok(_) => {}
            Err(e) => {
                debug!(stream = stream.as_str(), error = %e, "error reading child output");
                return ScanOutcome::Failed;
            }
        }

        if ctx.cancel.is_cancelled() {
            return ScanOutcome::Cancelled;
        }

        let seen_at = ctx.start.elapsed();
        let line = decode_line(&buf);
        let matched = ctx
            .phrase
            .as_deref()
            .is_some_and(|phrase| line.contains(phrase));

        if let Some(sink) = &ctx.sink {
            sink.offer(OutputLine::from_stream(stream, line));
        }

        if matched {
            debug!(
                stream = stream.as_str(),
                elapsed_ms = seen_at.as_millis() as u64,
                "phrase found in child output"
            );
            // Only the first report matters; a full slot means another
            // scanner already won.
            let _ = ctx.match_tx.try_send(seen_at);
            return ScanOutcome::Matched;
        }
    }
}

/// Strip the line terminator and decode lossily.
fn decode_line(buf: &[u8]) -> String {
    let mut end = buf.len();
    if end > 0 && buf[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && buf[end - 1] == b'\r' {
            end -= 1;
        }
    }
    String::from_utf8_lossy(&buf[..end]).into_owned()
}
