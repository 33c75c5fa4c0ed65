// tests/clipboard_export.rs

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};

use chrono_bench::config::BenchConfig;
use chrono_bench::types::RunResult;
use chrono_bench::ui::clipboard::{Multiplexer, copy_to, osc52_sequence, results_summary};

fn ok(ms: u64) -> RunResult {
    RunResult::measured(Duration::from_millis(ms), Duration::ZERO)
}

#[test]
fn summary_with_several_runs_has_mean_spread_and_range() {
    let config = BenchConfig::new(["sleep", "1"]);
    let results = [ok(100), ok(200), ok(300)];

    let text = results_summary(&config, &results);

    // Population std-dev of 0.1/0.2/0.3 s is ~0.0816 s.
    assert_eq!(text, "sleep 1\nMean: 0.200s ± 0.082s\nRange: 0.100s … 0.300s");
}

#[test]
fn summary_counts_failed_runs() {
    let config = BenchConfig::new(["sleep", "1"]);

    let text = results_summary(&config, &[ok(100), RunResult::not_found(), ok(100)]);
    assert_eq!(
        text,
        "sleep 1\nMean: 0.100s ± 0.000s (2/3 completed)\nRange: 0.100s … 0.100s"
    );

    let text = results_summary(&config, &[ok(250), RunResult::not_found()]);
    assert_eq!(text, "sleep 1\nTime: 0.250s (1 failed)");
}

#[test]
fn summary_without_successful_runs_names_the_cause() {
    let failed = [RunResult::not_found()];

    let completion = BenchConfig::new(["sleep", "9"]);
    assert!(results_summary(&completion, &failed).ends_with("all executions timed out"));

    let phrase = BenchConfig::new(["server"]).with_phrase("ready");
    assert!(results_summary(&phrase, &failed).ends_with("phrase not found"));
}

#[test]
fn osc52_payload_is_base64_of_the_text() {
    let seq = osc52_sequence("hi ± 1", Multiplexer::None);
    let payload = seq
        .strip_prefix("\x1b]52;c;")
        .and_then(|rest| rest.strip_suffix('\x07'))
        .expect("plain OSC 52 sequence");
    assert_eq!(B64.decode(payload).unwrap(), "hi ± 1".as_bytes());
}

#[test]
fn multiplexers_get_passthrough_wrapping() {
    let tmux = osc52_sequence("x", Multiplexer::Tmux);
    assert!(tmux.starts_with("\x1bPtmux;\x1b\x1b]52;c;"));
    assert!(tmux.ends_with("\x1b\\"));

    let long = "a".repeat(200);
    let screen = osc52_sequence(&long, Multiplexer::Screen);
    assert!(screen.starts_with("\x1bP\x1b]52;c;"));
    assert!(screen.ends_with("\x1b\\"));
    assert!(screen.matches("\x1b\\\x1bP").count() >= 2);
}

#[test]
fn multiplexer_detection_from_environment_values() {
    assert_eq!(
        Multiplexer::from_vars(Some("/tmp/tmux-1/default,1,0"), Some("screen")),
        Multiplexer::Tmux
    );
    assert_eq!(
        Multiplexer::from_vars(None, Some("screen-256color")),
        Multiplexer::Screen
    );
    assert_eq!(Multiplexer::from_vars(Some(""), Some("xterm")), Multiplexer::None);
    assert_eq!(Multiplexer::from_vars(None, None), Multiplexer::None);
}

#[test]
fn copy_writes_the_sequence() {
    let mut out = Vec::new();
    copy_to(&mut out, "x", Multiplexer::None).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), osc52_sequence("x", Multiplexer::None));
}
