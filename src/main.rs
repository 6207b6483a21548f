//! spendview main entry point

use anyhow::Context;
use clap::Parser;
use spendview_api::start_server;
use spendview_config::{Config, ConfigError};
use spendview_core::{FixtureApi, TransitionOutcome, ViewCoordinator};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "spendview")]
#[command(version = "0.1.0")]
#[command(about = "Transaction list over a paginated feed and a per-employee filter", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, missing_config) = match Config::load(&args.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => {
            eprintln!("{}", e.to_details());
            anyhow::bail!("invalid configuration in {}", args.config.display());
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level))
        .init();

    if missing_config {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    }
    log::info!(
        "Config loaded: fixture={}, page_size={}, latency={}ms",
        config.data.fixture_path.display(),
        config.api.page_size,
        config.api.latency_ms
    );

    let rt = Runtime::new()?;
    rt.block_on(async {
        let api = FixtureApi::from_file(&config.data.fixture_path, config.api.page_size)
            .await
            .with_context(|| format!("loading fixture {}", config.data.fixture_path.display()))?
            .with_latency(Duration::from_millis(config.api.latency_ms));

        let coordinator = Arc::new(ViewCoordinator::new(Arc::new(api)));

        // The server comes up while the directory and first page load
        tokio::spawn({
            let coordinator = coordinator.clone();
            async move {
                match coordinator.start().await {
                    TransitionOutcome::Completed => log::info!("Initial transaction load complete"),
                    outcome => log::warn!("Initial load finished with outcome {:?}", outcome),
                }
            }
        });

        start_server(config, coordinator).await
    })
}
