// src/lib.rs

pub mod calibration;
pub mod cli;
pub mod config;
pub mod driver;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod output;
pub mod stats;
pub mod types;
pub mod ui;

use tracing::{debug, info};

use crate::config::BenchConfig;
use crate::driver::BenchDriver;
use crate::errors::Result;
use crate::output::Printer;
use crate::types::RunMode;

/// High-level entry point used by `main.rs`.
///
/// Runs the benchmark described by `config` with real processes, either as
/// a plain report on stdout (`RunMode::Cli`) or in the interactive view.
pub async fn run(config: BenchConfig) -> Result<()> {
    run_with(&config, &BenchDriver::new()).await
}

/// [`run`] with an explicit driver (launcher and calibrator).
pub async fn run_with(config: &BenchConfig, driver: &BenchDriver) -> Result<()> {
    info!(
        command = %config.display_command(),
        phrase = ?config.phrase,
        runs = config.runs,
        warmups = config.warmups,
        mode = ?config.mode,
        "starting benchmark"
    );

    match config.mode {
        RunMode::Cli => {
            let mut printer = Printer::stdout();
            let report = driver.run(config, &mut printer).await?;
            debug!(stats = ?report.statistics(), "cli benchmark complete");
            Ok(())
        }
        RunMode::Interactive => ui::run_interactive(config, driver).await,
    }
}
