//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the benchvar tracing/logging system.
///
/// Reads the `BENCHVAR_LOG` environment variable for per-subsystem log
/// levels, e.g. `BENCHVAR_LOG=benchvar_collect=debug,benchvar_analysis=info`.
/// Falls back to `benchvar=info` if `BENCHVAR_LOG` is not set or invalid.
///
/// This function is idempotent; calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("BENCHVAR_LOG")
            .unwrap_or_else(|_| EnvFilter::new("benchvar=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
