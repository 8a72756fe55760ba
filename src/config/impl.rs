use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;
use crate::errors::Result;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Cheap to clone and lock-free. Falls back to defaults when `init_config`
/// was never called.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize the global configuration
///
/// Loads `hashlinker.toml` from the current directory (or `path` when given)
/// and applies `HL__*` environment overrides. Calling it again replaces the
/// previously loaded configuration.
///
/// # Examples
/// ```no_run
/// use hashlinker::config::init_config;
/// init_config(None).expect("invalid configuration");
/// ```
pub fn init_config(path: Option<&str>) -> Result<Arc<StaticConfig>> {
    let loaded = StaticConfig::load(path)?;
    Ok(set_config(loaded))
}

/// Replace the global configuration with an already built value
pub fn set_config(config: StaticConfig) -> Arc<StaticConfig> {
    let config = Arc::new(config);
    CONFIG
        .get_or_init(|| ArcSwap::from(config.clone()))
        .store(config.clone());
    config
}
