//! # Gesture Stabilization & Dispatch Engine (gmc-engine)
//!
//! Turns a stream of noisy per-frame gesture classifications into discrete,
//! rate-limited media commands.
//!
//! **Pipeline (one cycle per frame):**
//! perception signal → [`fusion`] → [`stabilizer`] → [`cooldown`] →
//! [`dispatcher`] → [`CommandSink`](dispatcher::CommandSink)
//!
//! Every stage except delivery is synchronous and free of I/O. Delivery to the
//! gesture bridge is fire-and-forget ([`delivery`]).

pub mod cooldown;
pub mod delivery;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod heuristic;
pub mod landmarks;
pub mod perception;
pub mod runner;
pub mod stabilizer;

pub use engine::{CycleOutcome, GestureEngine};
pub use error::{EngineError, Result};
