// src/config/mod.rs

//! Configuration loading and validation for chrono.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and the validated `BenchConfig`
//!   (`model.rs`).
//! - Load an optional config file from disk and overlay CLI flags
//!   (`loader.rs`).
//! - Validate invariants such as a non-empty command (`validate.rs`).
//! - Tokenize `--command "..."` strings (`command_line.rs`) and parse
//!   duration strings like `"1m30s"` (`duration.rs`).

pub mod command_line;
pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use command_line::{join_command, parse_command_string};
pub use duration::parse_duration;
pub use loader::{load_and_validate, load_from_path, resolve_config};
pub use model::{
    BenchConfig, BenchmarkSection, CommandSpec, RawConfigFile, DEFAULT_CALIBRATION_RUNS,
    DEFAULT_RUNS,
};
