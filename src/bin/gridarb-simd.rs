use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use gridarb::config::Config;
use gridarb::sim::dataset::Dataset;
use gridarb::sim::server::{self, SimState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .init();

    let data_dir = Path::new(&config.server.data_dir);
    let dataset = Dataset::load(data_dir)
        .with_context(|| format!("failed to load dataset from {}", data_dir.display()))?;
    tracing::info!(rows = dataset.len(), dir = %data_dir.display(), "Dataset loaded");

    let state = Arc::new(SimState::new(
        dataset,
        Duration::from_millis(config.server.tick_ms),
    ));
    server::run(state, &config.server.bind_addr).await
}
