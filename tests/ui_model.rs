// tests/ui_model.rs

mod common;
use crate::common::builders::BenchConfigBuilder;

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::time::Instant;

use chrono_bench::types::{LineKind, OutputLine, RunResult, StreamKind};
use chrono_bench::ui::{
    InputEvent, KeyAction, Phase, RunKind, SCROLL_STEPS, UiModel, ViewLine, handle_input,
    handle_key,
};

fn found(ms: u64) -> RunResult {
    RunResult::measured(Duration::from_millis(ms), Duration::ZERO)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn visible_text(model: &UiModel, height: usize) -> Vec<String> {
    model
        .visible_output(height)
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn phases_follow_the_benchmark_sequence() {
    let config = BenchConfigBuilder::new(["cmd"])
        .calibration(3)
        .warmups(1)
        .runs(2)
        .build();
    let mut model = UiModel::new(config);

    assert_eq!(model.phase(), Phase::Calibrating);
    assert_eq!(model.next_run(), None);

    model.calibration_done(Duration::from_millis(4), false);
    assert_eq!(model.calibration_warning(), None);
    assert_eq!(model.phase(), Phase::Warmup);
    assert_eq!(model.next_run(), Some(RunKind::Warmup));

    model.begin_run(RunKind::Warmup, Instant::now());
    model.finish_run(RunKind::Warmup, found(10), 0);
    assert_eq!(model.phase(), Phase::Benchmarking);
    assert_eq!(model.status_line(), "Status: Benchmarking (1/2)");

    for _ in 0..2 {
        model.begin_run(RunKind::Measured, Instant::now());
        model.finish_run(RunKind::Measured, found(20), 0);
    }
    assert_eq!(model.phase(), Phase::Completed);
    assert_eq!(model.next_run(), None);
    assert_eq!(model.results().len(), 2);
    assert!(model.timing_lines().iter().any(|l| l == "Final Results:"));
    assert!(model.config_lines().iter().any(|l| l == "Shell overhead: 0.004s"));
}

#[test]
fn skipped_calibration_starts_with_runs() {
    let config = BenchConfigBuilder::new(["cmd"]).build();
    let model = UiModel::new(config);
    assert_eq!(model.phase(), Phase::Benchmarking);
    assert_eq!(model.next_run(), Some(RunKind::Measured));
}

#[test]
fn measured_runs_get_a_separator_in_the_output() {
    let mut model = UiModel::new(BenchConfigBuilder::new(["cmd"]).build());

    model.begin_run(RunKind::Measured, Instant::now());
    model.push_line(&OutputLine::from_stream(StreamKind::Stderr, "warn"));
    model.push_line(&OutputLine::match_marker());

    assert_eq!(
        visible_text(&model, 10),
        vec!["", "--- Benchmark Run 1 ---", "", "stderr: warn", "Match found!"]
    );
    assert_eq!(model.visible_output(10)[1], &ViewLine::RunHeader(1));
}

#[test]
fn failed_runs_are_labelled_timeout() {
    let mut model = UiModel::new(BenchConfigBuilder::new(["cmd"]).runs(1).build());
    model.begin_run(RunKind::Measured, Instant::now());
    model.finish_run(RunKind::Measured, RunResult::not_found(), 0);
    assert!(model.timing_lines().iter().any(|l| l == "  #1: timeout"));
}

#[test]
fn error_stops_further_runs() {
    let mut model = UiModel::new(BenchConfigBuilder::new(["cmd"]).runs(3).build());
    model.fail("failed to start 'cmd'");
    assert_eq!(model.next_run(), None);
    assert_eq!(model.error(), Some("failed to start 'cmd'"));
}

#[test]
fn scrolling_and_follow_mode() {
    let mut model = UiModel::new(BenchConfigBuilder::new(["cmd"]).build());
    for i in 0..20 {
        model.push_line(&OutputLine::from_stream(StreamKind::Stdout, format!("line {i}")));
    }
    assert!(model.is_following());
    assert_eq!(visible_text(&model, 5).last().map(String::as_str), Some("line 19"));

    assert_eq!(handle_key(&mut model, key(KeyCode::Up), 5), KeyAction::None);
    assert_eq!(visible_text(&model, 5).last().map(String::as_str), Some("line 18"));
    assert!(!model.is_following());

    // New output does not move a scrolled viewport.
    model.push_line(&OutputLine::from_stream(StreamKind::Stdout, "line 20"));
    assert_eq!(visible_text(&model, 5).last().map(String::as_str), Some("line 18"));

    handle_key(&mut model, key(KeyCode::Char('j')), 5);
    handle_key(&mut model, key(KeyCode::Down), 5);
    assert!(model.is_following());

    handle_key(&mut model, key(KeyCode::Esc), 5);
    assert_eq!(visible_text(&model, 5).first().map(String::as_str), Some("line 0"));
    handle_key(&mut model, key(KeyCode::Esc), 5);
    assert!(model.is_following());

    // Cannot scroll past the first line.
    handle_key(&mut model, key(KeyCode::PageUp), 5);
    for _ in 0..10 {
        handle_key(&mut model, key(KeyCode::PageUp), 5);
    }
    assert_eq!(visible_text(&model, 5).first().map(String::as_str), Some("line 0"));
}

#[test]
fn quit_keys() {
    let mut model = UiModel::new(BenchConfigBuilder::new(["cmd"]).build());
    assert_eq!(handle_key(&mut model, key(KeyCode::Char('q')), 5), KeyAction::Quit);
    assert_eq!(
        handle_key(
            &mut model,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            5
        ),
        KeyAction::Quit
    );
    assert_eq!(handle_key(&mut model, key(KeyCode::Char('x')), 5), KeyAction::None);
}

#[test]
fn tick_updates_elapsed_only_while_running() {
    let mut model = UiModel::new(BenchConfigBuilder::new(["cmd"]).build());
    let start = Instant::now();
    model.tick(start + Duration::from_secs(1));
    assert_eq!(model.elapsed(), Duration::ZERO);

    model.begin_run(RunKind::Measured, start);
    model.tick(start + Duration::from_millis(300));
    assert_eq!(model.elapsed(), Duration::from_millis(300));
    assert!(model.is_running());
}

#[test]
fn output_keeps_the_stream_of_each_line() {
    let mut model = UiModel::new(BenchConfigBuilder::new(["cmd"]).build());
    model.push_line(&OutputLine::from_stream(StreamKind::Stdout, "stderr: x"));
    model.push_line(&OutputLine::from_stream(StreamKind::Stdout, "Match found!"));
    model.push_line(&OutputLine::from_stream(StreamKind::Stderr, "x"));

    let visible = model.visible_output(10);
    let kinds: Vec<LineKind> = visible
        .iter()
        .map(|line| match line {
            ViewLine::Output(output) => output.kind,
            other => panic!("unexpected row {other:?}"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![LineKind::Stdout, LineKind::Stdout, LineKind::Stderr]
    );
    // Same text on screen, different origin.
    assert_eq!(visible[0].to_string(), visible[2].to_string());
}

#[test]
fn failed_calibration_is_shown() {
    let config = BenchConfigBuilder::new(["cmd"]).calibration(3).build();
    let mut model = UiModel::new(config);

    model.calibration_done(Duration::ZERO, true);

    let warning = model.calibration_warning().expect("warning expected");
    assert!(warning.contains("shell calibration failed"));
    assert_eq!(model.phase(), Phase::Benchmarking);
}

#[test]
fn copy_key_only_after_completion() {
    let mut model = UiModel::new(BenchConfigBuilder::new(["cmd"]).runs(1).build());
    assert_eq!(handle_key(&mut model, key(KeyCode::Char('y')), 5), KeyAction::None);

    model.begin_run(RunKind::Measured, Instant::now());
    model.finish_run(RunKind::Measured, found(10), 0);
    assert_eq!(
        handle_key(&mut model, key(KeyCode::Char('y')), 5),
        KeyAction::CopyResults
    );

    let now = Instant::now();
    model.note_copied(now);
    assert_eq!(model.shortcuts(), "Results copied to clipboard!");
    model.tick(now + Duration::from_secs(1));
    assert_eq!(model.shortcuts(), "Results copied to clipboard!");
    model.tick(now + Duration::from_secs(3));
    assert!(model.shortcuts().contains("y: copy results"));
}

#[test]
fn wheel_scrolls_only_over_the_output_panel() {
    let mut model = UiModel::new(BenchConfigBuilder::new(["cmd"]).build());
    for i in 0..20 {
        model.push_line(&OutputLine::from_stream(StreamKind::Stdout, format!("line {i}")));
    }

    let over_status = InputEvent::Wheel { column: 10, up: true };
    assert_eq!(handle_input(&mut model, over_status, 40, 5), KeyAction::None);
    assert!(model.is_following());

    let over_output = InputEvent::Wheel { column: 50, up: true };
    handle_input(&mut model, over_output, 40, 5);
    let expected = format!("line {}", 19 - SCROLL_STEPS);
    assert_eq!(visible_text(&model, 5).last(), Some(&expected));

    handle_input(&mut model, InputEvent::Wheel { column: 50, up: false }, 40, 5);
    assert!(model.is_following());
}
