//! Gesture vocabulary and the gesture → action table
//!
//! Labels arrive from the perception service as free-form strings. They are
//! parsed once into [`Gesture`]; anything outside the known vocabulary becomes
//! [`Gesture::Unknown`] and carries its original text for logging.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Hand gestures understood by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Open palm facing the camera.
    PalmPausePlay,
    /// Closed fist.
    FistMute,
    /// Thumb pointing up.
    ThumbsUpLike,
    /// Thumb pointing down.
    ThumbsDownDislike,
    /// Two fingers raised.
    FingersUpVolumeUp,
    /// Two fingers pointing down.
    FingersDownVolumeDown,
    /// No hand, or no gesture worth acting on.
    None,
    /// A label the vocabulary does not know.
    Unknown(String),
}

impl Gesture {
    /// Every actionable gesture, in display order.
    pub const KNOWN: [Gesture; 6] = [
        Gesture::PalmPausePlay,
        Gesture::FistMute,
        Gesture::ThumbsUpLike,
        Gesture::ThumbsDownDislike,
        Gesture::FingersUpVolumeUp,
        Gesture::FingersDownVolumeDown,
    ];

    /// Parse a perception label. Never fails; unrecognised text maps to `Unknown`.
    ///
    /// Short names (`palm`, `fist`) and the stock MediaPipe recognizer labels
    /// (`Open_Palm`, `Closed_Fist`, `Thumb_Up`, `Thumb_Down`) are accepted as aliases.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "palm_pause_play" | "palm" | "open_palm" => Gesture::PalmPausePlay,
            "fist_mute" | "fist" | "closed_fist" => Gesture::FistMute,
            "thumbs_up_like" | "thumbs_up" | "thumb_up" => Gesture::ThumbsUpLike,
            "thumbs_down_dislike" | "thumbs_down" | "thumb_down" => Gesture::ThumbsDownDislike,
            "fingers_up_volume_up" | "fingers_up" => Gesture::FingersUpVolumeUp,
            "fingers_down_volume_down" | "fingers_down" => Gesture::FingersDownVolumeDown,
            "none" | "" => Gesture::None,
            _ => Gesture::Unknown(trimmed.to_string()),
        }
    }

    /// Canonical wire label
    pub fn as_str(&self) -> &str {
        match self {
            Gesture::PalmPausePlay => "palm_pause_play",
            Gesture::FistMute => "fist_mute",
            Gesture::ThumbsUpLike => "thumbs_up_like",
            Gesture::ThumbsDownDislike => "thumbs_down_dislike",
            Gesture::FingersUpVolumeUp => "fingers_up_volume_up",
            Gesture::FingersDownVolumeDown => "fingers_down_volume_down",
            Gesture::None => "none",
            Gesture::Unknown(label) => label,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Gesture::None)
    }

    /// Human-readable description for logs and UIs.
    pub fn description(&self) -> &'static str {
        match self {
            Gesture::PalmPausePlay => "Play/Pause",
            Gesture::FistMute => "Mute/Unmute",
            Gesture::ThumbsUpLike => "Volume Up / Like",
            Gesture::ThumbsDownDislike => "Volume Down / Dislike",
            Gesture::FingersUpVolumeUp => "Volume Up",
            Gesture::FingersDownVolumeDown => "Volume Down",
            Gesture::None => "No gesture",
            Gesture::Unknown(_) => "Unknown",
        }
    }

    /// Built-in action for this gesture.
    pub fn default_action(&self) -> Option<Action> {
        match self {
            Gesture::PalmPausePlay => Some(Action::PausePlay),
            Gesture::FistMute => Some(Action::Mute),
            Gesture::ThumbsUpLike => Some(Action::VolumeUp),
            Gesture::ThumbsDownDislike => Some(Action::VolumeDown),
            Gesture::FingersUpVolumeUp => Some(Action::VolumeUp),
            Gesture::FingersDownVolumeDown => Some(Action::VolumeDown),
            Gesture::None | Gesture::Unknown(_) => None,
        }
    }
}

impl Default for Gesture {
    fn default() -> Self {
        Gesture::None
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Gesture {
    fn from(label: &str) -> Self {
        Gesture::from_label(label)
    }
}

impl Serialize for Gesture {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Gesture {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Gesture::from_label(&label))
    }
}

/// Media effects the consumer knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    PausePlay,
    Mute,
    VolumeUp,
    VolumeDown,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::PausePlay => "pause_play",
            Action::Mute => "mute",
            Action::VolumeUp => "volume_up",
            Action::VolumeDown => "volume_down",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "pause_play" => Ok(Action::PausePlay),
            "mute" => Ok(Action::Mute),
            "volume_up" => Ok(Action::VolumeUp),
            "volume_down" => Ok(Action::VolumeDown),
            other => Err(Error::UnknownName {
                kind: "action",
                name: other.to_string(),
            }),
        }
    }
}

/// Gesture → action lookup: built-in defaults plus configured overrides.
///
/// An override of `None` unmaps a gesture, turning it into a no-op.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    overrides: HashMap<Gesture, Option<Action>>,
}

impl ActionTable {
    /// Table with only the built-in mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[actions]` config section (`label = "action"` or `label = "none"`).
    pub fn from_config(entries: &HashMap<String, String>) -> Result<Self> {
        let mut table = Self::new();
        for (label, action) in entries {
            let gesture = Gesture::from_label(label);
            if matches!(gesture, Gesture::None | Gesture::Unknown(_)) {
                return Err(Error::UnknownName {
                    kind: "gesture",
                    name: label.clone(),
                });
            }
            let action = match action.trim() {
                "none" => None,
                name => Some(name.parse::<Action>()?),
            };
            table.set(gesture, action);
        }
        Ok(table)
    }

    pub fn set(&mut self, gesture: Gesture, action: Option<Action>) {
        self.overrides.insert(gesture, action);
    }

    /// Resolve the action for a gesture. `None` means "no-op gesture".
    pub fn lookup(&self, gesture: &Gesture) -> Option<Action> {
        match self.overrides.get(gesture) {
            Some(action) => *action,
            None => gesture.default_action(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_labels_round_trip() {
        for gesture in Gesture::KNOWN.iter() {
            assert_eq!(&Gesture::from_label(gesture.as_str()), gesture);
        }
        assert_eq!(Gesture::from_label("none"), Gesture::None);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Gesture::from_label("palm"), Gesture::PalmPausePlay);
        assert_eq!(Gesture::from_label("Open_Palm"), Gesture::PalmPausePlay);
        assert_eq!(Gesture::from_label("Closed_Fist"), Gesture::FistMute);
        assert_eq!(Gesture::from_label(" Thumb_Up "), Gesture::ThumbsUpLike);
        assert_eq!(Gesture::from_label("None"), Gesture::None);
        assert_eq!(Gesture::from_label(""), Gesture::None);
    }

    #[test]
    fn test_unknown_label_keeps_text() {
        let gesture = Gesture::from_label("Victory");
        assert_eq!(gesture, Gesture::Unknown("Victory".to_string()));
        assert_eq!(gesture.as_str(), "Victory");
        assert_eq!(gesture.default_action(), None);
    }

    #[test]
    fn test_default_actions() {
        assert_eq!(Gesture::PalmPausePlay.default_action(), Some(Action::PausePlay));
        assert_eq!(Gesture::FistMute.default_action(), Some(Action::Mute));
        assert_eq!(Gesture::ThumbsUpLike.default_action(), Some(Action::VolumeUp));
        assert_eq!(Gesture::FingersUpVolumeUp.default_action(), Some(Action::VolumeUp));
        assert_eq!(Gesture::ThumbsDownDislike.default_action(), Some(Action::VolumeDown));
        assert_eq!(Gesture::None.default_action(), None);
    }

    #[test]
    fn test_serde_uses_wire_labels() {
        let json = serde_json::to_string(&Gesture::FistMute).unwrap();
        assert_eq!(json, "\"fist_mute\"");
        let parsed: Gesture = serde_json::from_str("\"palm\"").unwrap();
        assert_eq!(parsed, Gesture::PalmPausePlay);

        let action: Action = serde_json::from_str("\"volume_down\"").unwrap();
        assert_eq!(action, Action::VolumeDown);
        assert_eq!(serde_json::to_string(&Action::PausePlay).unwrap(), "\"pause_play\"");
    }

    #[test]
    fn test_action_parse_rejects_unknown() {
        assert!("skip".parse::<Action>().is_err());
        assert_eq!("mute".parse::<Action>().unwrap(), Action::Mute);
    }

    #[test]
    fn test_table_overrides() {
        let mut entries = HashMap::new();
        entries.insert("fist_mute".to_string(), "none".to_string());
        entries.insert("thumbs_up".to_string(), "pause_play".to_string());

        let table = ActionTable::from_config(&entries).unwrap();
        assert_eq!(table.lookup(&Gesture::FistMute), None);
        assert_eq!(table.lookup(&Gesture::ThumbsUpLike), Some(Action::PausePlay));
        assert_eq!(table.lookup(&Gesture::PalmPausePlay), Some(Action::PausePlay));
        assert_eq!(table.lookup(&Gesture::Unknown("x".into())), None);
    }

    #[test]
    fn test_table_rejects_bad_entries() {
        let mut entries = HashMap::new();
        entries.insert("wave".to_string(), "mute".to_string());
        assert!(ActionTable::from_config(&entries).is_err());

        let mut entries = HashMap::new();
        entries.insert("palm".to_string(), "rewind".to_string());
        assert!(ActionTable::from_config(&entries).is_err());
    }
}
