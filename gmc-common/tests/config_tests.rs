//! Integration tests for configuration file resolution
//!
//! Tests that manipulate GMC_CONFIG are marked with #[serial] so they run
//! sequentially, not in parallel.

use std::env;
use std::io::Write;

use gmc_common::config::{CooldownScope, GmcConfig, CONFIG_ENV_VAR};
use gmc_common::{Action, Gesture};
use serial_test::serial;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
    file.write_all(content.as_bytes()).expect("Should write config");
    file
}

#[test]
fn test_load_full_file() {
    let file = write_config(
        r#"
        [engine]
        confirmation_frames = 6
        fusion_floor = 0.4
        dispatch_threshold = 0.75
        cooldown_secs = 1.5
        cooldown_scope = "global"
        cross_validate = false

        [heuristic]
        finger_margin = 0.08
        min_extended = 5

        [delivery]
        endpoint = "http://127.0.0.1:9000"
        timeout_ms = 500

        [bridge]
        port = 9000

        [actions]
        thumbs_up_like = "pause_play"
        fingers_down_volume_down = "none"

        [logging]
        level = "debug"
        "#,
    );

    let config = GmcConfig::load(file.path()).expect("Should load config");
    assert_eq!(config.engine.confirmation_frames, 6);
    assert_eq!(config.engine.cooldown_scope, CooldownScope::Global);
    assert!(!config.engine.cross_validate);
    assert_eq!(config.engine.cooldown_window(), chrono::Duration::milliseconds(1500));
    assert_eq!(config.heuristic.min_extended, 5);
    assert_eq!(config.delivery.endpoint, "http://127.0.0.1:9000");
    assert_eq!(config.bridge.port, 9000);
    assert_eq!(config.logging.level, "debug");

    let table = config.action_table().unwrap();
    assert_eq!(table.lookup(&Gesture::ThumbsUpLike), Some(Action::PausePlay));
    assert_eq!(table.lookup(&Gesture::FingersDownVolumeDown), None);
}

#[test]
fn test_missing_explicit_file_is_error() {
    let result = GmcConfig::load(std::path::Path::new("/nonexistent/gmc/config.toml"));
    assert!(result.is_err());
}

#[test]
fn test_malformed_file_is_error() {
    let file = write_config("[engine\nconfirmation_frames = ");
    assert!(GmcConfig::load(file.path()).is_err());
}

#[test]
#[serial]
fn test_resolve_prefers_cli_over_env() {
    let cli_file = write_config("[bridge]\nport = 7001\n");
    let env_file = write_config("[bridge]\nport = 7002\n");
    env::set_var(CONFIG_ENV_VAR, env_file.path());

    let config = GmcConfig::resolve(Some(cli_file.path())).unwrap();
    assert_eq!(config.bridge.port, 7001);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_resolve_uses_env_var() {
    let env_file = write_config("[bridge]\nport = 7003\n");
    env::set_var(CONFIG_ENV_VAR, env_file.path());

    let config = GmcConfig::resolve(None).unwrap();
    assert_eq!(config.bridge.port, 7003);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_resolve_env_var_pointing_nowhere_fails() {
    env::set_var(CONFIG_ENV_VAR, "/nonexistent/gmc.toml");
    assert!(GmcConfig::resolve(None).is_err());
    env::remove_var(CONFIG_ENV_VAR);
}
