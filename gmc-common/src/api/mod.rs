//! Wire types for the gesture bridge HTTP protocol
//!
//! Shared by the bridge server and the engine's delivery client.

pub mod types;

pub use types::{
    CommandRequest, ErrorResponse, LatestGestureResponse, StatusResponse, SubmitResponse,
};
