//! # GMC Common Library
//!
//! Shared code for the gesture media control services:
//! - Gesture vocabulary and the gesture → action table
//! - Command type handed to the transport boundary
//! - Single-slot command mailbox
//! - Wire request/response types
//! - Configuration loading and validation

pub mod api;
pub mod command;
pub mod config;
pub mod error;
pub mod gesture;
pub mod mailbox;
pub mod time;

pub use command::Command;
pub use error::{Error, Result};
pub use gesture::{Action, ActionTable, Gesture};
pub use mailbox::{Mailbox, MailboxEntry};
