//! Hand landmark data structures
//!
//! The perception service reports 21 normalized hand landmarks in the
//! MediaPipe hand model layout. x grows to the right and y grows downward,
//! both in `0.0..=1.0` image units; z is relative depth and may be absent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Landmarks per hand
pub const LANDMARK_COUNT: usize = 21;

/// Hand joints in landmark index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandJoint {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandJoint {
    pub fn index(self) -> usize {
        self as usize
    }

    /// (tip, PIP base) pairs for the four non-thumb fingers
    pub fn finger_pairs() -> [(HandJoint, HandJoint); 4] {
        [
            (HandJoint::IndexTip, HandJoint::IndexPip),
            (HandJoint::MiddleTip, HandJoint::MiddlePip),
            (HandJoint::RingTip, HandJoint::RingPip),
            (HandJoint::PinkyTip, HandJoint::PinkyPip),
        ]
    }
}

/// One normalized landmark
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Why a landmark set was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LandmarkError {
    #[error("expected {expected} landmarks, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// A validated set of exactly 21 landmarks
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [LandmarkPoint; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn from_points(points: &[LandmarkPoint]) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }

        let mut validated = [LandmarkPoint::default(); LANDMARK_COUNT];
        validated.copy_from_slice(points);
        Ok(Self { points: validated })
    }

    pub fn joint(&self, joint: HandJoint) -> LandmarkPoint {
        self.points[joint.index()]
    }
}

/// Synthetic hands for tests; enabled for integration tests via `test-fixtures`
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures {
    use super::*;

    /// Build a synthetic right hand with the given digits extended.
    ///
    /// `fingers` is index, middle, ring, pinky.
    pub fn hand(thumb: bool, fingers: [bool; 4]) -> Vec<LandmarkPoint> {
        let mut points = vec![LandmarkPoint::default(); LANDMARK_COUNT];
        points[HandJoint::Wrist.index()] = LandmarkPoint::new(0.5, 0.9, 0.0);

        points[HandJoint::ThumbCmc.index()] = LandmarkPoint::new(0.45, 0.85, 0.0);
        points[HandJoint::ThumbMcp.index()] = LandmarkPoint::new(0.42, 0.8, 0.0);
        points[HandJoint::ThumbIp.index()] = LandmarkPoint::new(0.4, 0.75, 0.0);
        let thumb_x = if thumb { 0.3 } else { 0.45 };
        points[HandJoint::ThumbTip.index()] = LandmarkPoint::new(thumb_x, 0.72, 0.0);

        let columns = [0.45, 0.5, 0.55, 0.6];
        for (finger, ((tip, pip), x)) in HandJoint::finger_pairs().iter().zip(columns).enumerate() {
            let mcp = pip.index() - 1;
            let dip = pip.index() + 1;
            points[mcp] = LandmarkPoint::new(x, 0.7, 0.0);
            points[pip.index()] = LandmarkPoint::new(x, 0.6, 0.0);
            if fingers[finger] {
                points[dip] = LandmarkPoint::new(x, 0.5, 0.0);
                points[tip.index()] = LandmarkPoint::new(x, 0.4, 0.0);
            } else {
                points[dip] = LandmarkPoint::new(x, 0.63, 0.0);
                points[tip.index()] = LandmarkPoint::new(x, 0.65, 0.0);
            }
        }
        points
    }

    pub fn open_hand() -> Vec<LandmarkPoint> {
        hand(true, [true; 4])
    }

    /// Index and middle finger raised, everything else curled
    pub fn peace_sign() -> Vec<LandmarkPoint> {
        hand(false, [true, true, false, false])
    }
}
