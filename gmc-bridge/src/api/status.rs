//! Liveness probe

use axum::extract::State;
use axum::Json;
use gmc_common::api::StatusResponse;

use crate::AppState;

/// GET /status
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let latest = state.mailbox.latest();
    Json(StatusResponse::running(latest.as_ref()))
}
