// src/main.rs

use chrono_bench::config::resolve_config;
use chrono_bench::types::RunMode;
use chrono_bench::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("chrono error: {err:#}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let config = resolve_config(args.config.as_deref(), args.to_overrides()?)?;
    logging::init_logging(args.log_level, config.mode == RunMode::Interactive)?;
    run(config).await?;
    Ok(())
}
