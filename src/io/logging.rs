//! Logging initialisation
//!
//! Library code only emits `tracing` events; the binary installs a stderr
//! subscriber once so exported tables on stdout or disk never mix with logs.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::io::configuration::{DEFAULT_LOG_LEVEL, LOG_ENV_VAR, QUIET_LOG_LEVEL};

/// Build the log filter from `SURFALIGN_LOG`, then `RUST_LOG`, then the default
pub fn env_filter(quiet: bool) -> EnvFilter {
    let default_level = if quiet {
        QUIET_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    };
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global stderr subscriber
///
/// Later calls are ignored, so tests and embedding applications may call it freely.
pub fn init_logging(quiet: bool) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter(quiet))
        .with(console_layer)
        .try_init();
}
