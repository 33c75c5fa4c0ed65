// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChronoError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid command string: {0}")]
    CommandParse(String),

    /// The target command could not be started. Fatal for the run.
    #[error("failed to start '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChronoError {
    /// True when the error means the benchmarked command never ran.
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, ChronoError::Launch { .. })
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ChronoError>;
