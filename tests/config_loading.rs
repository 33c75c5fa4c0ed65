// tests/config_loading.rs

mod common;
use crate::common::builders::BenchConfigBuilder;

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use chrono_bench::config::{
    BenchmarkSection, CommandSpec, DEFAULT_CALIBRATION_RUNS, join_command, load_and_validate, parse_command_string,
    parse_duration, resolve_config,
};
use chrono_bench::errors::ChronoError;
use chrono_bench::types::RunMode;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_benchmark_section_is_loaded() {
    let file = write_config(
        r#"
[benchmark]
command = "cargo build --release"
phrase = "Finished"
runs = 5
warmups = 1
timeout = "2m"
calibration = 10
mode = "cli"
"#,
    );

    let config = load_and_validate(file.path()).unwrap();

    assert_eq!(config.command, vec!["cargo", "build", "--release"]);
    assert_eq!(config.phrase.as_deref(), Some("Finished"));
    assert_eq!(config.runs, 5);
    assert_eq!(config.warmups, 1);
    assert_eq!(config.timeout, Duration::from_secs(120));
    assert_eq!(config.calibration_runs, 10);
    assert!(!config.skip_calibration);
    assert_eq!(config.mode, RunMode::Cli);
}

#[test]
fn argv_array_command_is_used_verbatim() {
    let file = write_config(
        r#"
[benchmark]
command = ["sh", "-c", "echo 'a b'"]
"#,
    );

    let config = load_and_validate(file.path()).unwrap();

    assert_eq!(config.command, vec!["sh", "-c", "echo 'a b'"]);
    assert_eq!(config.runs, 1);
    assert_eq!(config.calibration_runs, DEFAULT_CALIBRATION_RUNS);
    assert_eq!(config.timeout, Duration::ZERO);
    assert_eq!(config.mode, RunMode::Interactive);
}

#[test]
fn cli_overrides_win_over_file_values() {
    let file = write_config(
        r#"
[benchmark]
command = "sleep 1"
runs = 3
phrase = "from file"
"#,
    );

    let overrides = BenchmarkSection {
        runs: Some(7),
        skip_calibration: Some(true),
        ..BenchmarkSection::default()
    };
    let config = resolve_config(Some(file.path()), overrides).unwrap();

    assert_eq!(config.command, vec!["sleep", "1"]);
    assert_eq!(config.runs, 7);
    assert_eq!(config.phrase.as_deref(), Some("from file"));
    assert!(config.skip_calibration);
}

#[test]
fn explicit_missing_config_file_is_an_error() {
    let overrides = BenchmarkSection {
        command: Some(CommandSpec::Line("true".into())),
        ..BenchmarkSection::default()
    };

    let result = resolve_config(
        Some(std::path::Path::new("/no/such/dir/chrono.toml")),
        overrides,
    );

    assert!(matches!(result, Err(ChronoError::IoError(_))));
}

#[test]
fn malformed_toml_is_reported() {
    let file = write_config("[benchmark\ncommand = ");

    let result = load_and_validate(file.path());

    assert!(matches!(result, Err(ChronoError::TomlError(_))));
}

#[test]
fn missing_command_is_rejected() {
    let file = write_config("[benchmark]\nruns = 2\n");

    match load_and_validate(file.path()) {
        Err(ChronoError::ConfigError(msg)) => assert!(msg.contains("command")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn zero_runs_is_rejected() {
    let section = BenchConfigBuilder::new(["true"]).runs(0).section();

    match chrono_bench::config::BenchConfig::try_from(section) {
        Err(ChronoError::ConfigError(msg)) => assert!(msg.contains("runs")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn invalid_timeout_is_rejected() {
    let section = BenchConfigBuilder::new(["true"]).timeout("soon").section();

    match chrono_bench::config::BenchConfig::try_from(section) {
        Err(ChronoError::ConfigError(msg)) => assert!(msg.contains("invalid timeout")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn empty_phrase_means_completion_mode() {
    let config = BenchConfigBuilder::new(["true"]).phrase("").build();
    assert!(config.phrase.is_none());
    assert!(!config.is_phrase_mode());
}

#[test]
fn duration_strings() {
    assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
    assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
    assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1500)));
    assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
    assert_eq!(parse_duration("2h"), Ok(Duration::from_secs(7200)));
    assert_eq!(parse_duration("10us"), Ok(Duration::from_micros(10)));
    assert_eq!(parse_duration(" 5s "), Ok(Duration::from_secs(5)));

    assert!(parse_duration("").is_err());
    assert!(parse_duration("5").is_err());
    assert!(parse_duration("5 days").is_err());
    assert!(parse_duration("ms").is_err());
}

#[test]
fn command_string_tokenizing() {
    assert_eq!(
        parse_command_string("sleep 1").unwrap(),
        vec!["sleep", "1"]
    );
    assert_eq!(
        parse_command_string("  echo   'hello world'  ").unwrap(),
        vec!["echo", "hello world"]
    );
    assert_eq!(
        parse_command_string(r#"sh -c "echo 'x'""#).unwrap(),
        vec!["sh", "-c", "echo 'x'"]
    );
    assert_eq!(
        parse_command_string(r"echo a\ b").unwrap(),
        vec!["echo", "a b"]
    );
    // Empty quotes are a real (empty) argument, as in a POSIX shell.
    assert_eq!(
        parse_command_string(r#"printf "" x"#).unwrap(),
        vec!["printf", "", "x"]
    );
    assert_eq!(
        parse_command_string(r#"echo "" a"#).unwrap(),
        vec!["echo", "", "a"]
    );
}

#[test]
fn display_command_splits_back_to_the_same_argv() {
    let argv: Vec<String> = ["sh", "-c", "echo 'hi there'", ""]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let joined = join_command(&argv);
    assert_eq!(parse_command_string(&joined).unwrap(), argv);

    let config = BenchConfigBuilder::new(argv.clone()).build();
    assert_eq!(config.display_command(), joined);
    assert_eq!(join_command(&["sleep".to_string(), "1".to_string()]), "sleep 1");
}

#[test]
fn command_string_errors() {
    assert!(matches!(
        parse_command_string("echo 'oops"),
        Err(ChronoError::CommandParse(msg)) if msg.contains("missing closing quote")
    ));
    assert!(matches!(
        parse_command_string("   "),
        Err(ChronoError::CommandParse(msg)) if msg.contains("empty")
    ));
}
