//! Geometric open-hand heuristic
//!
//! Counts extended digits from landmark geometry alone, independent of any
//! classifier model. The four fingers are judged on the vertical axis (tip
//! above the PIP joint), the thumb on the horizontal axis (tip spread away
//! from the wrist beyond its IP joint).

use gmc_common::config::HeuristicSettings;
use gmc_common::Gesture;

use crate::landmarks::{HandJoint, HandLandmarks};

/// Which digits are extended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtendedDigits {
    pub thumb: bool,
    /// index, middle, ring, pinky
    pub fingers: [bool; 4],
}

impl ExtendedDigits {
    pub fn count(&self) -> u8 {
        self.fingers.iter().filter(|f| **f).count() as u8 + u8::from(self.thumb)
    }
}

/// Heuristic output for one landmark set
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicVerdict {
    /// `PalmPausePlay` for an open hand, otherwise `None`
    pub gesture: Gesture,
    pub extended: u8,
    /// extended / 5
    pub confidence: f32,
}

/// Finger-count scorer
#[derive(Debug, Clone)]
pub struct FingerHeuristic {
    finger_margin: f32,
    thumb_margin: f32,
    min_extended: u8,
}

impl FingerHeuristic {
    pub fn new(settings: &HeuristicSettings) -> Self {
        Self {
            finger_margin: settings.finger_margin,
            thumb_margin: settings.thumb_margin,
            min_extended: settings.min_extended,
        }
    }

    pub fn extended_digits(&self, hand: &HandLandmarks) -> ExtendedDigits {
        let wrist = hand.joint(HandJoint::Wrist);
        let thumb_tip = hand.joint(HandJoint::ThumbTip);
        let thumb_ip = hand.joint(HandJoint::ThumbIp);
        let thumb = (thumb_tip.x - wrist.x).abs() > (thumb_ip.x - wrist.x).abs() + self.thumb_margin;

        let mut fingers = [false; 4];
        for (slot, (tip, pip)) in fingers.iter_mut().zip(HandJoint::finger_pairs()) {
            // y grows downward, so an extended tip has the smaller y
            *slot = hand.joint(pip).y - hand.joint(tip).y > self.finger_margin;
        }

        ExtendedDigits { thumb, fingers }
    }

    /// Score a hand. Open hand requires `min_extended` of 5 digits.
    pub fn score(&self, hand: &HandLandmarks) -> HeuristicVerdict {
        let extended = self.extended_digits(hand).count();
        let gesture = if extended >= self.min_extended {
            Gesture::PalmPausePlay
        } else {
            Gesture::None
        };

        HeuristicVerdict {
            gesture,
            extended,
            confidence: f32::from(extended) / 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::fixtures;

    fn heuristic() -> FingerHeuristic {
        FingerHeuristic::new(&HeuristicSettings::default())
    }

    fn score(points: Vec<crate::landmarks::LandmarkPoint>) -> HeuristicVerdict {
        heuristic().score(&HandLandmarks::from_points(&points).unwrap())
    }

    #[test]
    fn test_open_hand() {
        let verdict = score(fixtures::open_hand());
        assert_eq!(verdict.extended, 5);
        assert_eq!(verdict.gesture, Gesture::PalmPausePlay);
        assert_eq!(verdict.confidence, 1.0);
    }

    #[test]
    fn test_four_fingers_without_thumb_is_open() {
        let verdict = score(fixtures::hand(false, [true; 4]));
        assert_eq!(verdict.extended, 4);
        assert_eq!(verdict.gesture, Gesture::PalmPausePlay);
    }

    #[test]
    fn test_peace_sign_is_not_open() {
        let verdict = score(fixtures::peace_sign());
        assert_eq!(verdict.extended, 2);
        assert_eq!(verdict.gesture, Gesture::None);
        assert!((verdict.confidence - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_fist() {
        let verdict = score(fixtures::hand(false, [false; 4]));
        assert_eq!(verdict.extended, 0);
        assert_eq!(verdict.gesture, Gesture::None);
    }

    #[test]
    fn test_thumb_judged_horizontally() {
        let h = heuristic();
        let spread = HandLandmarks::from_points(&fixtures::hand(true, [false; 4])).unwrap();
        let tucked = HandLandmarks::from_points(&fixtures::hand(false, [false; 4])).unwrap();
        assert!(h.extended_digits(&spread).thumb);
        assert!(!h.extended_digits(&tucked).thumb);
    }

    #[test]
    fn test_stricter_bar() {
        let strict = FingerHeuristic::new(&HeuristicSettings {
            min_extended: 5,
            ..HeuristicSettings::default()
        });
        let hand = HandLandmarks::from_points(&fixtures::hand(false, [true; 4])).unwrap();
        assert_eq!(strict.score(&hand).gesture, Gesture::None);
    }
}
