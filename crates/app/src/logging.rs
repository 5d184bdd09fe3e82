//! Logging setup

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_ENV: &str = "TEMPLAR_LOG";

/// Installs a stderr subscriber filtered by `TEMPLAR_LOG`, `warn` by default.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();
}
