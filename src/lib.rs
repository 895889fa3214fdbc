pub mod app;
pub mod config;
pub mod email_client;
mod error;
pub mod nurture_client;
pub mod templ_manager;
pub mod utils;
pub mod waitlist;
pub mod web;

// re-exports
pub use app::{serve, App, AppState};
pub use email_client::EmailClient;
pub use error::{Error, Result};
pub use nurture_client::NurtureClient;

use tracing_subscriber::EnvFilter;

/// Tracing used in debug builds and tests.
/// Respects `RUST_LOG`, otherwise logs everything from `debug` up.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .compact()
        .init();
}

/// Tracing used in release builds.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
