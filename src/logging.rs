//! Diagnostic logging on stderr

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "CONFIGURATOR_LOG";

const DEFAULT_FILTER: &str = "warn";

static INIT: Once = Once::new();

/// Initialize logging from `CONFIGURATOR_LOG`, defaulting to warnings only
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    init_with_filter(filter);
}

/// Initialize logging with a specific filter
pub fn init_with_filter(filter: EnvFilter) {
    INIT.call_once(|| {
        // stdout carries rendered output only
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .init();
    });
}
