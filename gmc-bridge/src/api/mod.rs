//! HTTP API handlers for gmc-bridge

pub mod gesture;
pub mod status;

use axum::http::StatusCode;
use axum::Json;
use gmc_common::api::ErrorResponse;

pub use gesture::{get_latest_gesture, submit_gesture};
pub use status::get_status;

/// Fallback for unknown paths
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("not found")))
}
