// src/output/printer.rs

use std::io::{self, Write};
use std::time::Duration;

use colored::{ColoredString, Colorize};

use crate::config::BenchConfig;
use crate::stats::compute_statistics;
use crate::types::RunResult;

/// Seconds with millisecond precision, e.g. `1.234s`.
pub fn format_duration(d: Duration) -> String {
    format!("{:.3}s", d.as_secs_f64())
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Purple,
    Blue,
    Cyan,
    CyanBold,
    Green,
    Red,
    Yellow,
    Gray,
    Bold,
}

/// Writes progress and results to any `Write` sink (stdout in production,
/// a `Vec<u8>` in tests).
pub struct Printer<W: Write> {
    out: W,
    color: bool,
}

impl Printer<io::Stdout> {
    /// Printer on stdout, coloured when stdout is a terminal.
    pub fn stdout() -> Self {
        use std::io::IsTerminal;
        let color = io::stdout().is_terminal();
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        let styled: ColoredString = match tone {
            Tone::Purple => text.truecolor(0xcb, 0xa6, 0xf7),
            Tone::Blue => text.truecolor(0x89, 0xb4, 0xfa),
            Tone::Cyan => text.truecolor(0x94, 0xe2, 0xd5),
            Tone::CyanBold => text.truecolor(0x94, 0xe2, 0xd5).bold(),
            Tone::Green => text.truecolor(0xa6, 0xe3, 0xa1),
            Tone::Red => text.truecolor(0xf3, 0x8b, 0xa8),
            Tone::Yellow => text.truecolor(0xf9, 0xe2, 0xaf),
            Tone::Gray => text.truecolor(0x6c, 0x70, 0x86),
            Tone::Bold => text.bold(),
        };
        styled.to_string()
    }

    pub fn print_calibration(&mut self, runs: u32) -> io::Result<()> {
        let line = self.paint(
            &format!("Running {runs} calibration runs to measure shell startup overhead..."),
            Tone::Purple,
        );
        writeln!(self.out, "{line}")
    }

    pub fn print_shell_overhead(&mut self, overhead: Duration) -> io::Result<()> {
        let label = self.paint("Shell overhead:", Tone::Purple);
        let value = self.paint(&format_duration(overhead), Tone::Bold);
        writeln!(self.out, "{label} {value}\n")
    }

    /// Shown when every calibration sample failed.
    pub fn print_calibration_degraded(&mut self) -> io::Result<()> {
        let line = self.paint(
            "Warning: shell calibration failed, no overhead will be subtracted",
            Tone::Yellow,
        );
        writeln!(self.out, "{line}")
    }

    pub fn print_warmup_header(&mut self, warmups: u32) -> io::Result<()> {
        let line = self.paint(&format!("Running {warmups} warmup runs..."), Tone::Yellow);
        writeln!(self.out, "{line}")
    }

    pub fn print_warmup_result(&mut self, run: u32, result: &RunResult) -> io::Result<()> {
        let text = if result.found {
            format!("Warmup {run}: {}", format_duration(result.duration))
        } else {
            format!("Warmup {run}: phrase not found within timeout")
        };
        let line = self.paint(&text, Tone::Gray);
        writeln!(self.out, "{line}")
    }

    pub fn print_warmups_done(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn print_benchmark_header(&mut self, runs: u32) -> io::Result<()> {
        let line = self.paint(&format!("Running {runs} benchmark runs..."), Tone::Blue);
        writeln!(self.out, "{line}")
    }

    pub fn print_benchmark_result(&mut self, run: u32, result: &RunResult) -> io::Result<()> {
        let header = self.paint(&format!("--- Benchmark Run {run} ---"), Tone::CyanBold);
        writeln!(self.out, "\n{header}")?;

        let line = if result.found {
            let value = self.paint(&format_duration(result.duration), Tone::Bold);
            self.paint(&format!("Run {run}: {value}"), Tone::Green)
        } else {
            self.paint(&format!("Run {run}: phrase not found within timeout"), Tone::Red)
        };
        writeln!(self.out, "{line}")
    }

    /// Final block: mode line, then either a failure notice, a single time,
    /// or mean/min/max/range over the successful runs.
    pub fn print_summary(
        &mut self,
        results: &[RunResult],
        config: &BenchConfig,
        shell_overhead: Duration,
    ) -> io::Result<()> {
        writeln!(self.out)?;

        let valid: Vec<Duration> = results
            .iter()
            .filter(|r| r.found)
            .map(|r| r.duration)
            .collect();
        let failed = results.len() - valid.len();

        let warmup_info = if config.warmups > 0 {
            format!(" ({} warmups)", config.warmups)
        } else {
            String::new()
        };
        let calibration_info = if config.skip_calibration {
            String::new()
        } else {
            format!(" (-{} shell overhead)", format_duration(shell_overhead))
        };

        match &config.phrase {
            None => {
                let label = self.paint("Mode:", Tone::Cyan);
                writeln!(
                    self.out,
                    "{label} Command completion timing{warmup_info}{calibration_info}"
                )?;
            }
            Some(phrase) => {
                let label = self.paint("Phrase:", Tone::Cyan);
                let phrase = self.paint(phrase, Tone::Bold);
                writeln!(self.out, "{label} \"{phrase}\"{warmup_info}{calibration_info}")?;
            }
        }

        if valid.is_empty() {
            let text = if config.is_phrase_mode() {
                "No successful runs - phrase was not found in any execution"
            } else {
                "No successful runs - all commands timed out"
            };
            let line = self.paint(text, Tone::Red);
            return writeln!(self.out, "{line}");
        }

        if failed > 0 {
            let text = self.paint(&format!("Failed: {failed}/{}", results.len()), Tone::Red);
            write!(self.out, "{text}  ")?;
        }

        if valid.len() == 1 {
            let label = self.paint("Time:", Tone::Cyan);
            let value = self.paint(&format_duration(valid[0]), Tone::Bold);
            return writeln!(self.out, "{label} {value}");
        }

        let stats = compute_statistics(&valid);
        if failed == 0 {
            let text = self.paint(&format!("Runs: {}", valid.len()), Tone::Green);
            write!(self.out, "{text}  ")?;
        }
        let mean_label = self.paint("Mean:", Tone::Cyan);
        let mean = self.paint(&format_duration(stats.mean), Tone::Bold);
        let min_label = self.paint("Min:", Tone::Green);
        let max_label = self.paint("Max:", Tone::Red);
        let range_label = self.paint("Range:", Tone::Yellow);
        writeln!(
            self.out,
            "{mean_label} {mean}  {min_label} {}  {max_label} {}  {range_label} {}",
            format_duration(stats.min),
            format_duration(stats.max),
            format_duration(stats.range),
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
