//! Command dispatcher and the delivery seam
//!
//! The dispatcher turns an admitted gesture into a [`Command`]; a
//! [`CommandSink`] takes it from there. Sinks are fire-and-forget: `deliver`
//! must not block the perception loop and reports failures only through logs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gmc_common::{ActionTable, Command, Gesture, Mailbox};
use tracing::debug;

/// Destination for committed commands
pub trait CommandSink: Send + Sync {
    fn deliver(&self, command: &Command);
}

impl<T: CommandSink + ?Sized> CommandSink for Arc<T> {
    fn deliver(&self, command: &Command) {
        (**self).deliver(command)
    }
}

/// In-process delivery straight into a mailbox
impl CommandSink for Mailbox {
    fn deliver(&self, command: &Command) {
        self.ingest(command.clone());
    }
}

/// Sink that drops everything; used when no consumer is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CommandSink for NullSink {
    fn deliver(&self, command: &Command) {
        debug!("Dropping command {} (no sink)", command.action);
    }
}

/// Maps confirmed gestures to commands
#[derive(Debug, Clone, Default)]
pub struct CommandDispatcher {
    table: ActionTable,
}

impl CommandDispatcher {
    pub fn new(table: ActionTable) -> Self {
        Self { table }
    }

    /// Build the command for `gesture`, or `None` for a no-op gesture.
    pub fn build(&self, gesture: &Gesture, now: DateTime<Utc>) -> Option<Command> {
        let action = self.table.lookup(gesture)?;
        Some(Command::new(gesture.clone(), action, now))
    }
}
