//! Cooldown gate
//!
//! Decides whether a confirmed gesture may dispatch this cycle. Checking is
//! side-effect free; the engine calls [`CooldownGate::record`] only once a
//! command has actually been built, so unmapped gestures never consume a
//! cooldown window.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use gmc_common::config::{CooldownScope, EngineSettings};
use gmc_common::Gesture;

/// Key into the cooldown record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CooldownKey {
    Gesture(Gesture),
    Global,
}

/// Outcome of one gate check
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Admit,
    /// Confirmed label is `none`
    NoGesture,
    /// Confidence did not exceed the dispatch threshold
    LowConfidence { confidence: f32, threshold: f32 },
    /// Still inside the cooldown window
    CoolingDown { remaining: Duration },
}

impl GateDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, GateDecision::Admit)
    }
}

#[derive(Debug, Clone)]
pub struct CooldownGate {
    window: Duration,
    threshold: f32,
    scope: CooldownScope,
    last_fired: HashMap<CooldownKey, DateTime<Utc>>,
}

impl CooldownGate {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            window: settings.cooldown_window(),
            threshold: settings.dispatch_threshold,
            scope: settings.cooldown_scope,
            last_fired: HashMap::new(),
        }
    }

    fn key(&self, gesture: &Gesture) -> CooldownKey {
        match self.scope {
            CooldownScope::PerGesture => CooldownKey::Gesture(gesture.clone()),
            CooldownScope::Global => CooldownKey::Global,
        }
    }

    pub fn check(&self, gesture: &Gesture, confidence: f32, now: DateTime<Utc>) -> GateDecision {
        if gesture.is_none() {
            return GateDecision::NoGesture;
        }
        if confidence.is_nan() || confidence <= self.threshold {
            return GateDecision::LowConfidence {
                confidence,
                threshold: self.threshold,
            };
        }
        if let Some(last) = self.last_fired.get(&self.key(gesture)) {
            let elapsed = now.signed_duration_since(*last);
            if elapsed < self.window {
                return GateDecision::CoolingDown {
                    remaining: self.window - elapsed,
                };
            }
        }
        GateDecision::Admit
    }

    /// Record an accepted dispatch
    pub fn record(&mut self, gesture: &Gesture, now: DateTime<Utc>) {
        let key = self.key(gesture);
        self.last_fired.insert(key, now);
    }

    pub fn last_fired(&self, gesture: &Gesture) -> Option<DateTime<Utc>> {
        self.last_fired.get(&self.key(gesture)).copied()
    }
}
