//! gmc-engine - Gesture stabilization & dispatch engine
//!
//! Reads per-frame perception signals, confirms gestures, and dispatches
//! rate-limited media commands to the gesture bridge.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gmc_common::config::GmcConfig;
use gmc_common::time::now;
use gmc_common::{Gesture, Mailbox};
use gmc_engine::delivery::HttpDelivery;
use gmc_engine::dispatcher::{CommandDispatcher, CommandSink};
use gmc_engine::perception::JsonLinesSource;
use gmc_engine::runner::run_perception_loop;
use gmc_engine::GestureEngine;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{info, warn};

/// Command-line arguments for gmc-engine
#[derive(Parser, Debug)]
#[command(name = "gmc-engine")]
#[command(about = "Gesture stabilization and dispatch engine")]
#[command(version)]
struct Args {
    /// Config file (overrides GMC_CONFIG and the per-user file)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Bridge base URL
    #[arg(long, global = true, env = "GMC_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run the perception loop
    Run {
        /// JSON-lines frame file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Host the bridge in-process instead of POSTing to --endpoint
        #[arg(long)]
        serve: bool,

        /// Port for the in-process bridge
        #[arg(short, long, env = "GMC_BRIDGE_PORT")]
        port: Option<u16>,
    },
    /// Send one command for a gesture, bypassing stabilization
    Send {
        /// Gesture label, e.g. palm_pause_play or fist
        gesture: String,
    },
    /// Print the bridge's /status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = gmc_bridge::logging::init();
    info!(
        "Starting GMC Gesture Engine (gmc-engine) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let mut config =
        GmcConfig::resolve(args.config.as_deref()).context("Failed to load configuration")?;
    log_level.apply(&config.logging.level)?;
    if let Some(endpoint) = args.endpoint {
        config.delivery.endpoint = endpoint;
    }

    match args.command {
        Cmd::Run { input, serve, port } => {
            if let Some(port) = port {
                config.bridge.port = port;
            }
            run(config, input, serve).await
        }
        Cmd::Send { gesture } => send(config, &gesture).await,
        Cmd::Status => status(config).await,
    }
}

async fn run(config: GmcConfig, input: Option<PathBuf>, serve: bool) -> Result<()> {
    let mut engine = GestureEngine::from_config(&config)?;
    info!(
        "Engine: K={} frames, dispatch > {}, cooldown {}s ({:?})",
        config.engine.confirmation_frames,
        config.engine.dispatch_threshold,
        config.engine.cooldown_secs,
        config.engine.cooldown_scope
    );

    let (sink, server): (Arc<dyn CommandSink>, _) = if serve {
        let mailbox = Arc::new(Mailbox::new());
        let state = gmc_bridge::AppState::new(mailbox.clone(), config.action_table()?);
        let app = gmc_bridge::build_router(state);

        let addr = format!("{}:{}", config.bridge.host, config.bridge.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("In-process bridge listening on http://{}", addr);

        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(gmc_bridge::shutdown_signal())
                .await
        });
        (mailbox as Arc<dyn CommandSink>, Some(server))
    } else {
        let delivery = HttpDelivery::new(&config.delivery)?;
        match delivery.probe().await {
            Ok(status) => info!(
                "✓ Bridge reachable at {} (status: {})",
                config.delivery.endpoint, status.status
            ),
            Err(e) => warn!(
                "Bridge not reachable at {}: {} (continuing)",
                config.delivery.endpoint, e
            ),
        }
        (Arc::new(delivery) as Arc<dyn CommandSink>, None)
    };

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            info!("Reading frames from {}", path.display());
            Box::new(BufReader::new(file))
        }
        None => {
            info!("Reading frames from stdin");
            Box::new(BufReader::new(tokio::io::stdin()))
        }
    };
    let mut source = JsonLinesSource::new(reader);

    let summary =
        run_perception_loop(&mut engine, &mut source, &sink, gmc_bridge::shutdown_signal()).await?;
    info!(
        "Processed {} frames ({} faults), dispatched {} commands",
        summary.frames, summary.faults, summary.dispatched
    );

    if let Some(server) = server {
        info!("Bridge still serving; press Ctrl+C to stop");
        server
            .await
            .context("Bridge task failed")?
            .context("Server error")?;
    }

    info!("Shutdown complete");
    Ok(())
}

async fn send(config: GmcConfig, label: &str) -> Result<()> {
    let gesture = Gesture::from_label(label);
    if let Gesture::Unknown(name) = &gesture {
        bail!("Unknown gesture '{}'", name);
    }

    let dispatcher = CommandDispatcher::new(config.action_table()?);
    let Some(command) = dispatcher.build(&gesture, now()) else {
        bail!("Gesture '{}' has no action", gesture);
    };

    let delivery = HttpDelivery::new(&config.delivery)?;
    let response = delivery
        .send(&command)
        .await
        .with_context(|| format!("Failed to send to {}", delivery.gesture_url()))?;
    info!("Sent {} -> {} ({})", command.gesture, command.action, response.status);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn status(config: GmcConfig) -> Result<()> {
    let delivery = HttpDelivery::new(&config.delivery)?;
    let status = delivery
        .probe()
        .await
        .with_context(|| format!("Bridge not reachable at {}", config.delivery.endpoint))?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
