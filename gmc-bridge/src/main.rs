//! gmc-bridge - Gesture bridge service
//!
//! Receives committed gesture commands over HTTP and holds the latest one for
//! polling consumers such as a browser extension.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use gmc_bridge::{build_router, shutdown_signal, AppState};
use gmc_common::config::GmcConfig;
use gmc_common::Mailbox;
use tracing::info;

/// Command-line arguments for gmc-bridge
#[derive(Parser, Debug)]
#[command(name = "gmc-bridge")]
#[command(about = "Gesture bridge: latest-command mailbox over HTTP")]
#[command(version)]
struct Args {
    /// Config file (overrides GMC_CONFIG and the per-user file)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "GMC_BRIDGE_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "GMC_BRIDGE_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = gmc_bridge::logging::init();
    info!(
        "Starting GMC Gesture Bridge (gmc-bridge) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = GmcConfig::resolve(args.config.as_deref()).context("Failed to load configuration")?;
    log_level.apply(&config.logging.level)?;

    let host = args.host.unwrap_or(config.bridge.host.clone());
    let port = args.port.unwrap_or(config.bridge.port);

    let state = AppState::new(Arc::new(Mailbox::new()), config.action_table()?);
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("gmc-bridge listening on http://{}", addr);
    info!("  GET  /status   liveness and latest gesture");
    info!("  GET  /gesture  latest command");
    info!("  POST /gesture  submit command");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
