//! gmc-bridge library - Gesture bridge
//!
//! Holds the most recent command in a single-slot mailbox and serves it to
//! polling consumers over HTTP. Producers POST commands to `/gesture`.

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::get;
use axum::Router;
use gmc_common::{ActionTable, Mailbox};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod api;
pub mod logging;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Latest received command
    pub mailbox: Arc<Mailbox>,
    /// Fallback gesture → action mapping for requests without a usable action
    pub actions: Arc<ActionTable>,
}

impl AppState {
    pub fn new(mailbox: Arc<Mailbox>, actions: ActionTable) -> Self {
        Self {
            mailbox,
            actions: Arc::new(actions),
        }
    }
}

/// Build application router
///
/// `/status` and `/gesture` carry permissive CORS headers and answer any
/// OPTIONS request with 200. Everything else is 404.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/status", get(api::get_status))
        .route(
            "/gesture",
            get(api::get_latest_gesture).post(api::submit_gesture),
        )
        .route_layer(cors)
        .fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
