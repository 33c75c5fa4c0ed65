// src/exec/lines.rs

//! Non-blocking delivery of output lines to a live consumer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

use crate::types::OutputLine;

/// Lines buffered between the scanners and a streaming consumer.
pub const LINE_BUFFER: usize = 100;

/// Sending half of the line stream.
///
/// `offer` never waits: if the consumer has fallen behind and the buffer is
/// full, the line is dropped and counted instead of stalling the scanner
/// (which would in turn stall the child on a full pipe).
#[derive(Debug, Clone)]
pub struct LineSink {
    tx: mpsc::Sender<OutputLine>,
    dropped: Arc<AtomicU64>,
}

impl LineSink {
    pub fn new(tx: mpsc::Sender<OutputLine>) -> Self {
        Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a sink and its receiver with [`LINE_BUFFER`] capacity.
    pub fn channel() -> (Self, mpsc::Receiver<OutputLine>) {
        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        (Self::new(tx), rx)
    }

    /// Try to deliver `line`; returns whether it was accepted.
    pub fn offer(&self, line: OutputLine) -> bool {
        match self.tx.try_send(line) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Lines dropped so far across all clones of this sink.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Shared drop counter, readable after the sink itself is gone.
    pub fn dropped_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.dropped)
    }
}
