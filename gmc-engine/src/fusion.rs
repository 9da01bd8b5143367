//! Fusion detector
//!
//! Produces one `(gesture, confidence)` hypothesis per frame from the
//! classifier output and, when available, the landmark heuristic. The two
//! signals must agree; disagreement yields `(none, 0.0)`. Any malformed input
//! also yields `(none, 0.0)` so a bad frame never escapes this stage.

use gmc_common::config::{EngineSettings, HeuristicSettings};
use gmc_common::Gesture;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::heuristic::{FingerHeuristic, HeuristicVerdict};
use crate::landmarks::{HandLandmarks, LandmarkPoint};

/// Classifier output for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierHypothesis {
    pub label: Gesture,
    pub confidence: f32,
}

impl ClassifierHypothesis {
    pub fn new(label: impl Into<Gesture>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Fusion detector output
#[derive(Debug, Clone, PartialEq)]
pub struct FusedHypothesis {
    pub gesture: Gesture,
    pub confidence: f32,
}

impl FusedHypothesis {
    pub fn new(gesture: Gesture, confidence: f32) -> Self {
        Self { gesture, confidence }
    }

    /// The `(none, 0.0)` hypothesis substituted for faulty frames
    pub fn none() -> Self {
        Self::new(Gesture::None, 0.0)
    }
}

/// Combines classifier and landmark signals
#[derive(Debug, Clone)]
pub struct FusionDetector {
    floor: f32,
    classifier_weight: f32,
    heuristic_weight: f32,
    cross_validate: bool,
    heuristic: FingerHeuristic,
}

impl FusionDetector {
    pub fn new(engine: &EngineSettings, heuristic: &HeuristicSettings) -> Self {
        Self {
            floor: engine.fusion_floor,
            classifier_weight: engine.classifier_weight,
            heuristic_weight: engine.heuristic_weight,
            cross_validate: engine.cross_validate,
            heuristic: FingerHeuristic::new(heuristic),
        }
    }

    /// Classifier-only path: pass through, subject to the confidence floor.
    pub fn ingest_classifier(&self, hypothesis: &ClassifierHypothesis) -> FusedHypothesis {
        if !hypothesis.confidence.is_finite() {
            debug!("Classifier confidence is not finite, substituting none");
            return FusedHypothesis::none();
        }
        let confidence = hypothesis.confidence.clamp(0.0, 1.0);
        self.apply_floor(FusedHypothesis::new(hypothesis.label.clone(), confidence))
    }

    /// Cross-validate a classifier hypothesis against a heuristic verdict.
    pub fn combine(
        &self,
        classifier: &ClassifierHypothesis,
        verdict: &HeuristicVerdict,
    ) -> FusedHypothesis {
        let classified = self.ingest_classifier(classifier);
        // The classifier must clear the floor on its own before its vote counts
        if classified.gesture.is_none() && !classifier.label.is_none() {
            debug!(
                "Classifier {} below floor ({:.2}), not cross-validating",
                classifier.label, classified.confidence
            );
            return FusedHypothesis::none();
        }
        if classified.gesture != verdict.gesture {
            debug!(
                "Fusion disagreement: classifier={} heuristic={} ({} extended)",
                classified.gesture, verdict.gesture, verdict.extended
            );
            return FusedHypothesis::none();
        }

        let confidence = self.classifier_weight * classified.confidence
            + self.heuristic_weight * verdict.confidence;
        self.apply_floor(FusedHypothesis::new(classified.gesture, confidence))
    }

    /// Fuse one frame's signals.
    ///
    /// `classifier` is `None` when the classifier failed for this frame.
    pub fn fuse(
        &self,
        classifier: Option<&ClassifierHypothesis>,
        landmarks: Option<&[LandmarkPoint]>,
    ) -> FusedHypothesis {
        let Some(classifier) = classifier else {
            debug!("No classifier output for frame, substituting none");
            return FusedHypothesis::none();
        };

        match landmarks {
            Some(points) if self.cross_validate => match HandLandmarks::from_points(points) {
                Ok(hand) => self.combine(classifier, &self.heuristic.score(&hand)),
                Err(e) => {
                    debug!("Malformed landmarks ({}), substituting none", e);
                    FusedHypothesis::none()
                }
            },
            _ => self.ingest_classifier(classifier),
        }
    }

    fn apply_floor(&self, hypothesis: FusedHypothesis) -> FusedHypothesis {
        if hypothesis.confidence < self.floor {
            FusedHypothesis::new(Gesture::None, hypothesis.confidence)
        } else {
            hypothesis
        }
    }
}
