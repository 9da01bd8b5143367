//! Configuration loading and validation
//!
//! Configuration file resolution follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. `GMC_CONFIG` environment variable
//! 3. Per-user config file (`~/.config/gmc/config.toml` on Linux)
//! 4. Compiled defaults (fallback)
//!
//! An explicitly named file (tiers 1 and 2) must exist and parse. A missing
//! per-user file only produces a warning and the compiled defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::gesture::ActionTable;
use crate::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "GMC_CONFIG";

/// Complete configuration file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GmcConfig {
    pub engine: EngineSettings,
    pub heuristic: HeuristicSettings,
    pub delivery: DeliverySettings,
    pub bridge: BridgeSettings,
    /// Gesture label → action name (`"none"` unmaps the gesture)
    pub actions: HashMap<String, String>,
    pub logging: LoggingConfig,
}

/// How cooldown timestamps are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooldownScope {
    /// Each gesture has its own cooldown window
    #[default]
    PerGesture,
    /// One window shared by every gesture
    Global,
}

/// Stabilization and dispatch parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Consecutive matching cycles required to confirm a gesture (K)
    pub confirmation_frames: u32,
    /// Hypotheses below this confidence are forced to `none`
    pub fusion_floor: f32,
    /// Confirmed gestures must exceed this confidence to dispatch
    pub dispatch_threshold: f32,
    /// Minimum seconds between accepted dispatches
    pub cooldown_secs: f64,
    pub cooldown_scope: CooldownScope,
    /// Cross-check the classifier against the landmark heuristic when landmarks are present
    pub cross_validate: bool,
    pub classifier_weight: f32,
    pub heuristic_weight: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            confirmation_frames: 8,
            fusion_floor: 0.5,
            dispatch_threshold: 0.7,
            cooldown_secs: 2.0,
            cooldown_scope: CooldownScope::PerGesture,
            cross_validate: true,
            classifier_weight: 0.6,
            heuristic_weight: 0.4,
        }
    }
}

impl EngineSettings {
    pub fn cooldown_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds((self.cooldown_secs * 1000.0).round() as i64)
    }
}

/// Landmark finger-count heuristic parameters (normalized image units)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicSettings {
    /// How far a fingertip must sit above its PIP joint to count as extended
    pub finger_margin: f32,
    /// How much farther from the wrist the thumb tip must be than its IP joint
    pub thumb_margin: f32,
    /// Extended digits required for an open hand
    pub min_extended: u8,
}

impl Default for HeuristicSettings {
    fn default() -> Self {
        Self {
            finger_margin: 0.05,
            thumb_margin: 0.05,
            min_extended: 4,
        }
    }
}

/// Outbound command delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliverySettings {
    /// Base URL of the gesture bridge
    pub endpoint: String,
    pub timeout_ms: u64,
    pub probe_timeout_ms: u64,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8081".to_string(),
            timeout_ms: 1000,
            probe_timeout_ms: 2000,
        }
    }
}

/// Gesture bridge listener
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    pub host: String,
    pub port: u16,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8081,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl GmcConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GmcConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Resolve the config file location and load it
    pub fn resolve(cli_path: Option<&Path>) -> Result<Self> {
        // Priority 1 and 2: explicit file, must load
        if let Some(path) = explicit_config_path(cli_path) {
            info!("Loading configuration from {}", path.display());
            return Self::load(&path);
        }

        // Priority 3: per-user file, optional
        if let Some(path) = default_config_path() {
            if path.exists() {
                info!("Loading configuration from {}", path.display());
                return Self::load(&path);
            }
            warn!(
                "No config file at {}, using compiled defaults",
                path.display()
            );
        }

        // Priority 4: compiled defaults
        Ok(Self::default())
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        let e = &self.engine;
        if e.confirmation_frames == 0 {
            return Err(Error::Config("engine.confirmation_frames must be at least 1".to_string()));
        }
        check_unit("engine.fusion_floor", e.fusion_floor)?;
        check_unit("engine.dispatch_threshold", e.dispatch_threshold)?;
        check_unit("engine.classifier_weight", e.classifier_weight)?;
        check_unit("engine.heuristic_weight", e.heuristic_weight)?;
        if !e.cooldown_secs.is_finite() || e.cooldown_secs < 0.0 {
            return Err(Error::Config(format!(
                "engine.cooldown_secs must be a non-negative number, got {}",
                e.cooldown_secs
            )));
        }
        if (e.classifier_weight + e.heuristic_weight - 1.0).abs() > 1e-3 {
            return Err(Error::Config(format!(
                "engine weights must sum to 1.0, got {} + {}",
                e.classifier_weight, e.heuristic_weight
            )));
        }
        if e.classifier_weight < e.heuristic_weight {
            return Err(Error::Config(
                "engine.classifier_weight must not be below engine.heuristic_weight".to_string(),
            ));
        }

        let h = &self.heuristic;
        if !(1..=5).contains(&h.min_extended) {
            return Err(Error::Config(format!(
                "heuristic.min_extended must be between 1 and 5, got {}",
                h.min_extended
            )));
        }
        if !(h.finger_margin.is_finite() && h.finger_margin >= 0.0)
            || !(h.thumb_margin.is_finite() && h.thumb_margin >= 0.0)
        {
            return Err(Error::Config("heuristic margins must be non-negative".to_string()));
        }

        let d = &self.delivery;
        if !(d.endpoint.starts_with("http://") || d.endpoint.starts_with("https://")) {
            return Err(Error::Config(format!(
                "delivery.endpoint must be an http(s) URL, got '{}'",
                d.endpoint
            )));
        }
        if d.timeout_ms == 0 || d.probe_timeout_ms == 0 {
            return Err(Error::Config("delivery timeouts must be greater than zero".to_string()));
        }

        self.action_table()?;
        Ok(())
    }

    /// Action table with `[actions]` overrides applied
    pub fn action_table(&self) -> Result<ActionTable> {
        ActionTable::from_config(&self.actions)
            .map_err(|e| Error::Config(format!("actions: {}", e)))
    }
}

fn check_unit(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Config(format!("{} must be within 0.0..=1.0, got {}", name, value)))
    }
}

/// Explicit config path from the CLI or `GMC_CONFIG`
pub fn explicit_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }
    std::env::var(CONFIG_ENV_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Per-user config file location for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gmc").join("config.toml"))
}
