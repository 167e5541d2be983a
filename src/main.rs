//! Growthdash API Server
//!
//! Run with: cargo run --bin growthdash
//!
//! # Configuration
//!
//! Read from `--config <PATH>` when given, otherwise from the first of
//! `~/.config/growthdash/config.toml`, `/etc/growthdash/config.toml` and
//! `./config.toml` that exists. `GROWTHDASH_*` environment variables
//! override file values; `RUST_LOG` overrides the log filter.

use clap::Parser;
use growthdash::api::{serve, AppState};
use growthdash::config::Config;
use growthdash::dashboard::DashboardController;
use growthdash::logging;
use growthdash::tokenguard::TokenGuardClient;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "growthdash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Growth index dashboard server")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // No subscriber is installed yet; keep the loader's warnings visible
    let config = logging::with_bootstrap("info", || match args.config {
        Some(path) => Config::load_with_env(&path),
        None => Ok(Config::load_default()),
    })?;

    logging::init(&config.logging);

    tracing::info!("Starting Growthdash server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("TokenGuard endpoint: {}", config.tokenguard.endpoint);

    let client = TokenGuardClient::new(config.tokenguard.client_config())?;
    let selection = config.dashboard.selection();
    tracing::info!(
        chain_from = %selection.chain_from,
        chain_to = %selection.chain_to,
        granularity = config.dashboard.granularity.stride(),
        "Initial selection"
    );

    let dashboard =
        DashboardController::spawn(Arc::new(client), selection, config.dashboard.granularity);

    let state = AppState::new(dashboard.clone(), config.api.clone());
    let result = serve(state, &config.api).await;

    tracing::info!("Stopping dashboard controller...");
    if let Err(e) = dashboard.shutdown().await {
        tracing::debug!(error = %e, "Dashboard controller already stopped");
    }

    result?;
    tracing::info!("Growthdash server stopped");
    Ok(())
}
