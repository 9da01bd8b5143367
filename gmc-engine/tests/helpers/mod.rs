//! Shared fixtures for gmc-engine integration tests

#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use gmc_common::config::{EngineSettings, HeuristicSettings};
use gmc_common::time::from_unix_seconds;
use gmc_common::{ActionTable, Command};
use gmc_engine::dispatcher::CommandSink;
use gmc_engine::GestureEngine;

pub use gmc_engine::landmarks::fixtures::{hand, open_hand};

/// Sink that keeps every delivered command
#[derive(Default)]
pub struct RecordingSink {
    commands: Mutex<Vec<Command>>,
}

impl RecordingSink {
    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }
}

impl CommandSink for RecordingSink {
    fn deliver(&self, command: &Command) {
        self.commands.lock().unwrap().push(command.clone());
    }
}

/// Seconds after a fixed epoch
pub fn at(secs: f64) -> DateTime<Utc> {
    from_unix_seconds(1_700_000_000.0 + secs).unwrap()
}

pub fn engine_with(k: u32, cooldown_secs: f64) -> GestureEngine {
    let settings = EngineSettings {
        confirmation_frames: k,
        cooldown_secs,
        ..EngineSettings::default()
    };
    GestureEngine::new(&settings, &HeuristicSettings::default(), ActionTable::new())
}
