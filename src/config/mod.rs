//! Builds an `AppConfig` from the config files in `config/` layered with environment variables.
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod error;
mod structs;

use std::sync::OnceLock;
use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use structs::{
    AppConfig, EmailConfig, Environment, NetConfig, NurtureConfig, CREDENTIAL_ENV_VAR,
    NURTURE_CREDENTIAL_ENV_VAR,
};

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!("{:<20} - Initializing the configuration", "get_or_init_config");
        AppConfig::load().unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"))
    })
}
