//! Diagnostic logging for spotdump.
//!
//! Console feedback for the operator goes through the `info!`/`success!`/
//! `warning!` macros. Everything else (skipped records, page fetches, token
//! refreshes) is emitted as `tracing` events on stderr so it can be filtered
//! with `RUST_LOG` without touching the regular output.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "spotdump=info,warn";

/// Initialize the logging system.
///
/// The log level can be controlled via the `RUST_LOG` environment variable.
/// Calling this twice returns an error from the second call.
pub fn init_logging() -> Result<(), String> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| e.to_string())
}
