//! `/gesture` polling and ingest

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gmc_common::api::{CommandRequest, ErrorResponse, LatestGestureResponse, SubmitResponse};
use tracing::{info, warn};

use crate::AppState;

/// GET /gesture
///
/// Never blocks on producers; returns whatever the mailbox holds.
pub async fn get_latest_gesture(State(state): State<AppState>) -> Json<LatestGestureResponse> {
    let latest = state.mailbox.latest();
    Json(LatestGestureResponse::from_entry(latest.as_ref()))
}

/// POST /gesture
///
/// The body is parsed regardless of `Content-Type`. Malformed bodies leave
/// the mailbox untouched.
pub async fn submit_gesture(State(state): State<AppState>, body: Bytes) -> Response {
    let request: CommandRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return bad_request(format!("invalid command body: {}", e)),
    };

    let command = match request.into_command(&state.actions) {
        Ok(command) => command,
        Err(e) => return bad_request(e.to_string()),
    };

    info!(
        "Received gesture command: {} -> {}",
        command.gesture, command.action
    );
    let gesture = command.gesture.clone();
    state.mailbox.ingest(command);

    (StatusCode::OK, Json(SubmitResponse::received(gesture))).into_response()
}

fn bad_request(message: String) -> Response {
    warn!("Rejected gesture command: {}", message);
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
}
