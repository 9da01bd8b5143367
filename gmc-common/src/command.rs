//! Command handed to the transport boundary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gesture::{Action, Gesture};

/// One committed control event.
///
/// Serialises to the `POST /gesture` body: `{gesture, action, timestamp, description}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub gesture: Gesture,
    pub action: Action,
    #[serde(with = "crate::time::unix_seconds")]
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

impl Command {
    /// Build a command with the gesture's built-in description.
    pub fn new(gesture: Gesture, action: Action, timestamp: DateTime<Utc>) -> Self {
        let description = gesture.description().to_string();
        Self {
            gesture,
            action,
            timestamp,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::from_unix_seconds;

    #[test]
    fn test_wire_shape() {
        let ts = from_unix_seconds(1_700_000_000.5).unwrap();
        let command = Command::new(Gesture::FistMute, Action::Mute, ts);
        let value = serde_json::to_value(&command).unwrap();

        assert_eq!(value["gesture"], "fist_mute");
        assert_eq!(value["action"], "mute");
        assert_eq!(value["description"], "Mute/Unmute");
        assert_eq!(value["timestamp"].as_f64().unwrap(), 1_700_000_000.5);
    }
}
