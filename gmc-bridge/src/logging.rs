//! Tracing setup shared by the gmc binaries
//!
//! The subscriber is installed before configuration is resolved so the
//! resolution messages are visible. Once the config is loaded its
//! `[logging] level` replaces the startup filter, unless `RUST_LOG` is set.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

const STARTUP_LEVEL: &str = "info";

/// Handle for replacing the active log filter after startup
#[derive(Clone)]
pub struct LogLevel {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogLevel {
    /// Apply the configured level. A `RUST_LOG` filter always wins.
    pub fn apply(&self, level: &str) -> anyhow::Result<()> {
        if self.from_env {
            return Ok(());
        }
        let filter = EnvFilter::try_new(level)
            .map_err(|e| anyhow::anyhow!("Invalid logging.level '{}': {}", level, e))?;
        self.handle.reload(filter)?;
        Ok(())
    }
}

/// Reloadable filter layer, `RUST_LOG` first, then the startup level
pub fn filter_layer() -> (reload::Layer<EnvFilter, Registry>, LogLevel) {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(STARTUP_LEVEL), false),
    };
    let (layer, handle) = reload::Layer::new(filter);
    (layer, LogLevel { handle, from_env })
}

/// Install the global subscriber
pub fn init() -> LogLevel {
    let (filter, level) = filter_layer();
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
    level
}
