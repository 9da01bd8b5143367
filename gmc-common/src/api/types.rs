//! Request/response bodies for `/status` and `/gesture`

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::gesture::{Action, ActionTable, Gesture};
use crate::mailbox::MailboxEntry;
use crate::time::{from_unix_seconds, now, to_unix_seconds};
use crate::{Error, Result};

/// GET /status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub latest_gesture: Option<Gesture>,
    /// Arrival time of the latest command in Unix seconds, 0 when empty
    pub timestamp: f64,
}

impl StatusResponse {
    pub fn running(latest: Option<&MailboxEntry>) -> Self {
        Self {
            status: "running".to_string(),
            latest_gesture: latest.map(|e| e.command.gesture.clone()),
            timestamp: latest.map(|e| to_unix_seconds(e.received_at)).unwrap_or(0.0),
        }
    }
}

/// GET /gesture response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestGestureResponse {
    pub gesture: Option<Gesture>,
    pub timestamp: f64,
    pub status: String,
}

impl LatestGestureResponse {
    pub fn from_entry(latest: Option<&MailboxEntry>) -> Self {
        Self {
            gesture: latest.map(|e| e.command.gesture.clone()),
            timestamp: latest.map(|e| to_unix_seconds(e.received_at)).unwrap_or(0.0),
            status: "success".to_string(),
        }
    }
}

/// POST /gesture request body
///
/// Only `gesture` is required. Producers that predate the action field, or
/// that send extra fields such as `confidence` or `test`, are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    pub gesture: Gesture,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl CommandRequest {
    /// Resolve into a [`Command`].
    ///
    /// An explicit, recognised `action` wins; otherwise the gesture's entry in
    /// `table` is used. A gesture with neither is rejected.
    pub fn into_command(self, table: &ActionTable) -> Result<Command> {
        if self.gesture.is_none() {
            return Err(Error::InvalidInput("gesture must not be none".to_string()));
        }

        let explicit = self
            .action
            .as_deref()
            .and_then(|name| name.parse::<Action>().ok());
        let action = explicit.or_else(|| table.lookup(&self.gesture)).ok_or_else(|| {
            Error::InvalidInput(format!("no action for gesture '{}'", self.gesture))
        })?;

        let timestamp = match self.timestamp {
            Some(secs) => from_unix_seconds(secs)
                .ok_or_else(|| Error::InvalidInput(format!("invalid timestamp: {}", secs)))?,
            None => now(),
        };

        let description = self
            .description
            .unwrap_or_else(|| self.gesture.description().to_string());

        Ok(Command {
            gesture: self.gesture,
            action,
            timestamp,
            description,
        })
    }
}

impl From<&Command> for CommandRequest {
    fn from(command: &Command) -> Self {
        Self {
            gesture: command.gesture.clone(),
            action: Some(command.action.as_str().to_string()),
            timestamp: Some(to_unix_seconds(command.timestamp)),
            description: Some(command.description.clone()),
            confidence: None,
        }
    }
}

/// POST /gesture success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    pub gesture: Gesture,
}

impl SubmitResponse {
    pub fn received(gesture: Gesture) -> Self {
        Self {
            status: "received".to_string(),
            gesture,
        }
    }
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}
