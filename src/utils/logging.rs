// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up the logging framework using tracing_subscriber.
/// Reads log level filters from the `RUST_LOG` environment variable; when it
/// is unset, falls back to "info" (or "debug" when the CLI asked for verbose
/// output).
pub fn setup_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    fmt().with_env_filter(filter).init();

    tracing::debug!("Logging setup complete.");
}
