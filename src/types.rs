use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// How a benchmark session is presented.
///
/// - `Interactive`: live terminal view with streamed command output
///   (default behaviour).
/// - `Cli`: plain line-oriented report on stdout, suitable for pipes and CI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Interactive,
    Cli,
}

impl Default for RunMode {
    fn default() -> Self {
        RunMode::Interactive
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "interactive" | "tui" => Ok(RunMode::Interactive),
            "cli" => Ok(RunMode::Cli),
            other => Err(format!(
                "invalid mode: {other} (expected \"interactive\" or \"cli\")"
            )),
        }
    }
}

/// Which standard stream of the child a line was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

/// Outcome of a single run.
///
/// `found == false` means "no usable measurement" (timeout, phrase never
/// seen) and always carries a zero duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunResult {
    /// Elapsed time minus shell overhead, floored at zero.
    pub duration: Duration,
    pub found: bool,
}

impl RunResult {
    /// A successful measurement with overhead already removed from `elapsed`.
    pub fn measured(elapsed: Duration, shell_overhead: Duration) -> Self {
        Self {
            duration: elapsed.saturating_sub(shell_overhead),
            found: true,
        }
    }

    pub fn not_found() -> Self {
        Self {
            duration: Duration::ZERO,
            found: false,
        }
    }
}

/// Kind of an [`OutputLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Stdout,
    Stderr,
    /// Synthetic line emitted once when the phrase was detected.
    MatchMarker,
}

/// One line of child output as seen by a live consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: LineKind,
    pub text: String,
}

impl OutputLine {
    pub const MATCH_MARKER_TEXT: &'static str = "Match found!";

    pub fn from_stream(stream: StreamKind, text: impl Into<String>) -> Self {
        let kind = match stream {
            StreamKind::Stdout => LineKind::Stdout,
            StreamKind::Stderr => LineKind::Stderr,
        };
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn match_marker() -> Self {
        Self {
            kind: LineKind::MatchMarker,
            text: Self::MATCH_MARKER_TEXT.to_string(),
        }
    }

    pub fn is_stderr(&self) -> bool {
        self.kind == LineKind::Stderr
    }
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LineKind::Stderr => write!(f, "stderr: {}", self.text),
            LineKind::Stdout | LineKind::MatchMarker => f.write_str(&self.text),
        }
    }
}
