//! Structured logging initialization via `tracing`.

/// Initialize the tracing subscriber.
///
/// Respects the `RUST_LOG` environment variable for filtering and defaults
/// to `info` when it is unset, so audit progress is visible out of the box.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
