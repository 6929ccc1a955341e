//! Structured logging initialization via `tracing`.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with sensible defaults.
///
/// Respects the `RUST_LOG` environment variable for filtering.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

/// Like [`init_tracing`], but falls back to `level` (e.g. a config file's
/// `log_level`) when `RUST_LOG` is unset.
pub fn init_tracing_with_level(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_or(level))
        .init();
}

/// JSON lines output, for log shippers.
pub fn init_json_tracing(level: &str) {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter_or(level))
        .init();
}

/// Install a test-writer subscriber if none is installed yet.
///
/// Safe to call from every test.
pub fn try_init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_or("debug"))
        .with_test_writer()
        .try_init();
}

fn filter_or(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
