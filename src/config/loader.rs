// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{BenchConfig, BenchmarkSection, RawConfigFile};
use crate::errors::Result;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "chrono.toml";

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] or [`resolve_config`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it on its own, without
/// any CLI overrides.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BenchConfig> {
    let raw = load_from_path(&path)?;
    BenchConfig::try_from(raw.benchmark)
}

/// Build the effective config: file values (if any) overlaid by CLI values.
///
/// - An explicit `config_path` must exist.
/// - Without one, [`default_config_path`] is used only if it exists.
pub fn resolve_config(
    config_path: Option<&Path>,
    overrides: BenchmarkSection,
) -> Result<BenchConfig> {
    let base = match config_path {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            load_from_path(path)?.benchmark
        }
        None => {
            let path = default_config_path();
            if path.is_file() {
                debug!(path = %path.display(), "loading default config file");
                load_from_path(&path)?.benchmark
            } else {
                BenchmarkSection::default()
            }
        }
    };

    BenchConfig::try_from(base.overlay(overrides))
}

/// Helper to resolve a default config path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
