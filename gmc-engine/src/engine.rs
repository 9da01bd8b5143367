//! Gesture engine
//!
//! Owns all per-session state (stabilizer streak, cooldown record) and runs
//! one cycle per perception frame:
//! fuse → stabilize → gate → build command → deliver.

use chrono::{DateTime, Utc};
use gmc_common::config::{EngineSettings, GmcConfig, HeuristicSettings};
use gmc_common::{ActionTable, Command, Gesture};
use tracing::{debug, info, trace};

use crate::cooldown::{CooldownGate, GateDecision};
use crate::dispatcher::{CommandDispatcher, CommandSink};
use crate::fusion::{FusedHypothesis, FusionDetector};
use crate::perception::FrameSignal;
use crate::stabilizer::Stabilizer;
use crate::Result;

/// Everything one cycle decided
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub fused: FusedHypothesis,
    pub confirmed: Gesture,
    /// Consecutive cycles the current raw label has been seen
    pub streak: u32,
    pub gate: GateDecision,
    /// Built command, if this cycle dispatched
    pub command: Option<Command>,
}

pub struct GestureEngine {
    detector: FusionDetector,
    stabilizer: Stabilizer,
    gate: CooldownGate,
    dispatcher: CommandDispatcher,
}

impl GestureEngine {
    pub fn new(settings: &EngineSettings, heuristic: &HeuristicSettings, table: ActionTable) -> Self {
        Self {
            detector: FusionDetector::new(settings, heuristic),
            stabilizer: Stabilizer::new(settings.confirmation_frames),
            gate: CooldownGate::new(settings),
            dispatcher: CommandDispatcher::new(table),
        }
    }

    pub fn from_config(config: &GmcConfig) -> Result<Self> {
        let table = config.action_table()?;
        Ok(Self::new(&config.engine, &config.heuristic, table))
    }

    /// Run one cycle for a perception frame. Performs no I/O.
    pub fn process(&mut self, signal: &FrameSignal, now: DateTime<Utc>) -> CycleOutcome {
        let fused = self
            .detector
            .fuse(signal.classifier.as_ref(), signal.landmarks.as_deref());
        self.process_fused(fused, now)
    }

    /// Run one cycle for a frame the perception source could not deliver.
    pub fn process_fault(&mut self, now: DateTime<Utc>) -> CycleOutcome {
        self.process_fused(FusedHypothesis::none(), now)
    }

    /// Run the post-fusion stages on an already fused hypothesis.
    pub fn process_fused(&mut self, fused: FusedHypothesis, now: DateTime<Utc>) -> CycleOutcome {
        let confirmed = self.stabilizer.observe(&fused.gesture).clone();
        let streak = self.stabilizer.streak();
        trace!(
            "raw={} ({:.2}) confirmed={} stability {}/{}",
            fused.gesture,
            fused.confidence,
            confirmed,
            streak.min(self.stabilizer.threshold()),
            self.stabilizer.threshold()
        );

        let gate = self.gate.check(&confirmed, fused.confidence, now);
        let command = if gate.is_admitted() {
            match self.dispatcher.build(&confirmed, now) {
                Some(command) => {
                    self.gate.record(&confirmed, now);
                    info!("Gesture: {} -> Action: {}", command.gesture, command.action);
                    Some(command)
                }
                None => {
                    debug!("Gesture {} has no mapped action", confirmed);
                    None
                }
            }
        } else {
            None
        };

        CycleOutcome {
            fused,
            confirmed,
            streak,
            gate,
            command,
        }
    }

    /// Run one cycle and hand any built command to `sink`.
    pub fn step<S: CommandSink + ?Sized>(
        &mut self,
        signal: &FrameSignal,
        now: DateTime<Utc>,
        sink: &S,
    ) -> CycleOutcome {
        let outcome = self.process(signal, now);
        if let Some(command) = &outcome.command {
            sink.deliver(command);
        }
        outcome
    }

    /// Fault-cycle counterpart of [`step`](Self::step).
    pub fn step_fault<S: CommandSink + ?Sized>(&mut self, now: DateTime<Utc>, sink: &S) -> CycleOutcome {
        let outcome = self.process_fault(now);
        if let Some(command) = &outcome.command {
            sink.deliver(command);
        }
        outcome
    }

    pub fn confirmed(&self) -> &Gesture {
        self.stabilizer.confirmed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmc_common::time::from_unix_seconds;
    use gmc_common::Action;

    fn at(secs: f64) -> DateTime<Utc> {
        from_unix_seconds(10_000.0 + secs).unwrap()
    }

    fn engine(k: u32, cooldown_secs: f64) -> GestureEngine {
        let settings = EngineSettings {
            confirmation_frames: k,
            cooldown_secs,
            ..EngineSettings::default()
        };
        GestureEngine::new(&settings, &HeuristicSettings::default(), ActionTable::new())
    }

    #[test]
    fn test_dispatches_once_confirmed() {
        let mut engine = engine(3, 2.0);
        let palm = || FusedHypothesis::new(Gesture::PalmPausePlay, 0.9);

        assert!(engine.process_fused(palm(), at(0.0)).command.is_none());
        assert!(engine.process_fused(palm(), at(0.1)).command.is_none());
        let outcome = engine.process_fused(palm(), at(0.2));
        let command = outcome.command.expect("third palm should dispatch");
        assert_eq!(command.action, Action::PausePlay);
        assert_eq!(command.timestamp, at(0.2));

        // Held gesture stays inside the cooldown window
        let outcome = engine.process_fused(palm(), at(0.3));
        assert!(matches!(outcome.gate, GateDecision::CoolingDown { .. }));
    }

    #[test]
    fn test_low_confidence_confirmed_gesture_does_not_dispatch() {
        let mut engine = engine(1, 2.0);
        let outcome = engine.process_fused(FusedHypothesis::new(Gesture::FistMute, 0.6), at(0.0));
        assert_eq!(outcome.confirmed, Gesture::FistMute);
        assert!(outcome.command.is_none());
    }

    #[test]
    fn test_unmapped_gesture_does_not_consume_cooldown() {
        let settings = EngineSettings {
            confirmation_frames: 1,
            cooldown_scope: gmc_common::config::CooldownScope::Global,
            ..EngineSettings::default()
        };
        let mut engine =
            GestureEngine::new(&settings, &HeuristicSettings::default(), ActionTable::new());

        let unknown = FusedHypothesis::new(Gesture::Unknown("Victory".into()), 0.95);
        let outcome = engine.process_fused(unknown, at(0.0));
        assert!(outcome.gate.is_admitted());
        assert!(outcome.command.is_none());

        let outcome = engine.process_fused(FusedHypothesis::new(Gesture::FistMute, 0.95), at(0.1));
        assert!(outcome.command.is_some());
    }

    #[test]
    fn test_fault_cycle_feeds_none() {
        let mut engine = engine(2, 2.0);
        let outcome = engine.process_fault(at(0.0));
        assert_eq!(outcome.fused, FusedHypothesis::none());
        assert_eq!(outcome.gate, GateDecision::NoGesture);
    }
}
