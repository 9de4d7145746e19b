// --- File: crates/travelwish_common/src/logging.rs ---
//! Structured logging setup built on `tracing`.

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes logging from the `RUST_LOG` environment variable,
/// defaulting to `info` when unset.
pub fn init() {
    init_with_default("info");
}

/// Initializes logging with an explicit default directive.
pub fn init_with_default(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // try_init so tests can call this repeatedly without panicking
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
