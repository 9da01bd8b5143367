//! Common error types for GMC

use thiserror::Error;

/// Common result type for GMC operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across GMC services
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unrecognised gesture or action name
    #[error("Unknown {kind}: {name}")]
    UnknownName { kind: &'static str, name: String },

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
