//! Error types for gmc-engine

use thiserror::Error;

/// Main error type for the engine crate
#[derive(Error, Debug)]
pub enum EngineError {
    /// Shared configuration / vocabulary errors
    #[error(transparent)]
    Common(#[from] gmc_common::Error),

    /// Perception input could not be read at all
    #[error("Perception source I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// One perception line was unusable; the cycle degrades to `none`
    #[error("Malformed frame on line {line}: {reason}")]
    MalformedFrame { line: u64, reason: String },

    /// Bridge could not be reached or timed out
    #[error("Delivery error: {0}")]
    Delivery(#[from] reqwest::Error),

    /// Bridge answered with a non-success status
    #[error("Bridge rejected request with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl EngineError {
    /// Per-frame faults that the perception loop absorbs instead of stopping
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::MalformedFrame { .. })
    }
}

/// Convenience Result type using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;
