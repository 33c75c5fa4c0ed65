// tests/runtime_fake_launcher.rs
//
// Drives the detection runtime with scripted in-memory processes.

mod common;
use crate::common::fake_launcher::{Exit, ScriptedLauncher, Step};
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::time::Duration;

use chrono_bench::config::BenchConfig;
use chrono_bench::exec::run_once_with;

type TestResult = Result<(), Box<dyn Error>>;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn out(line: &str) -> Step {
    Step::Stdout(line.to_string())
}

fn err(line: &str) -> Step {
    Step::Stderr(line.to_string())
}

#[tokio::test]
async fn match_time_is_measured_from_launch() -> TestResult {
    init_tracing();
    let launcher = ScriptedLauncher::new(vec![
        out("booting"),
        Step::Sleep(ms(120)),
        out("server ready"),
    ])
    .exit(Exit::Never);
    let stats = launcher.stats();
    let config = BenchConfig::new(["server"]).with_phrase("ready");

    let result = with_timeout(run_once_with(&launcher, &config, Duration::ZERO)).await?;

    assert!(result.found);
    assert!(result.duration >= ms(100), "got {:?}", result.duration);
    assert_eq!(stats.launches(), 1);
    assert_eq!(stats.kills(), 1);
    Ok(())
}

#[tokio::test]
async fn overhead_is_subtracted_from_match_time() -> TestResult {
    init_tracing();
    let launcher =
        ScriptedLauncher::new(vec![Step::Sleep(ms(150)), out("ready")]).exit(Exit::Never);
    let config = BenchConfig::new(["server"]).with_phrase("ready");

    let result = with_timeout(run_once_with(&launcher, &config, ms(100))).await?;

    assert!(result.found);
    assert!(result.duration >= ms(40));
    assert!(result.duration < ms(1_000));
    Ok(())
}

#[tokio::test]
async fn stderr_match_counts() -> TestResult {
    init_tracing();
    let launcher = ScriptedLauncher::new(vec![out("noise"), err("fatal: port in use")]);
    let config = BenchConfig::new(["server"]).with_phrase("port in use");

    let result = with_timeout(run_once_with(&launcher, &config, Duration::ZERO)).await?;

    assert!(result.found);
    Ok(())
}

#[tokio::test]
async fn phrase_emitted_right_before_exit_is_still_found() -> TestResult {
    init_tracing();
    // Exit is reported as soon as the script is written, typically before the
    // scanner has looked at the line.
    let launcher = ScriptedLauncher::new(vec![out("hello")]).exit(Exit::AfterScript);
    let config = BenchConfig::new(["echo", "hello"]).with_phrase("hello");

    for _ in 0..20 {
        let result = with_timeout(run_once_with(&launcher, &config, Duration::ZERO)).await?;
        assert!(result.found);
    }
    Ok(())
}

#[tokio::test]
async fn timeout_wins_when_phrase_never_appears() -> TestResult {
    init_tracing();
    let launcher = ScriptedLauncher::new(vec![out("still starting")])
        .exit(Exit::Never)
        .hold_output_open();
    let stats = launcher.stats();
    let config = BenchConfig::new(["server"])
        .with_phrase("ready")
        .with_timeout(ms(80));

    let result = with_timeout(run_once_with(&launcher, &config, Duration::ZERO)).await?;

    assert!(!result.found);
    assert_eq!(result.duration, Duration::ZERO);
    assert_eq!(stats.kills(), 1);
    Ok(())
}

#[tokio::test]
async fn timeout_in_completion_mode() -> TestResult {
    init_tracing();
    let launcher = ScriptedLauncher::new(vec![]).exit(Exit::After(Duration::from_secs(30)));
    let config = BenchConfig::new(["sleep", "30"]).with_timeout(ms(50));

    let result = with_timeout(run_once_with(&launcher, &config, Duration::ZERO)).await?;

    assert!(!result.found);
    Ok(())
}

#[tokio::test]
async fn exhausted_output_ends_phrase_run_without_waiting_for_exit() -> TestResult {
    init_tracing();
    // Output closes but the process would live for a minute.
    let launcher = ScriptedLauncher::new(vec![out("nothing to see")])
        .exit(Exit::After(Duration::from_secs(60)));
    let stats = launcher.stats();
    let config = BenchConfig::new(["daemon"]).with_phrase("ready");

    let result = with_timeout(run_once_with(&launcher, &config, Duration::ZERO)).await?;

    assert!(!result.found);
    assert_eq!(stats.kills(), 1);
    Ok(())
}

#[tokio::test]
async fn completion_mode_measures_exit_not_output_drain() -> TestResult {
    init_tracing();
    // Exit after 60ms while the output pipe stays open: the drain grace ends
    // the run, and the measurement is the exit time.
    let launcher = ScriptedLauncher::new(vec![out("line")])
        .exit(Exit::After(ms(60)))
        .hold_output_open();
    let config = BenchConfig::new(["job"]);

    let result = with_timeout(run_once_with(&launcher, &config, Duration::ZERO)).await?;

    assert!(result.found);
    assert!(result.duration >= ms(50));
    assert!(result.duration < ms(150), "got {:?}", result.duration);
    Ok(())
}

#[tokio::test]
async fn completion_mode_ignores_phrase_like_output() -> TestResult {
    init_tracing();
    let launcher = ScriptedLauncher::new(vec![out("ready"), Step::Sleep(ms(50))]);
    let config = BenchConfig::new(["job"]);

    let result = with_timeout(run_once_with(&launcher, &config, Duration::ZERO)).await?;

    assert!(result.found);
    assert!(result.duration >= ms(40));
    Ok(())
}

#[tokio::test]
async fn non_utf8_output_does_not_stop_the_scan() -> TestResult {
    init_tracing();
    let launcher = ScriptedLauncher::new(vec![
        Step::StdoutRaw(vec![0xff, 0xfe, b'\n']),
        out("ready"),
    ])
    .exit(Exit::Never);
    let config = BenchConfig::new(["bin"]).with_phrase("ready");

    let result = with_timeout(run_once_with(&launcher, &config, Duration::ZERO)).await?;

    assert!(result.found);
    Ok(())
}

#[tokio::test]
async fn failing_launcher_surfaces_launch_error() -> TestResult {
    init_tracing();
    let launcher = ScriptedLauncher::failing();
    let config = BenchConfig::new(["missing"]);

    let err = run_once_with(&launcher, &config, Duration::ZERO)
        .await
        .expect_err("launch must fail");

    assert!(err.is_launch_failure());
    Ok(())
}
