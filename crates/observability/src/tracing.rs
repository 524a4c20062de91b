//! Tracing/logging initialization.
//!
//! Events are written as JSON lines. The filter comes from `RUST_LOG` and
//! falls back to [`DEFAULT_FILTER`].

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Build the filter the subscriber is installed with.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the JSON subscriber as the global default.
///
/// Returns `false` when a global subscriber was already installed (by an
/// earlier call or by someone else), in which case nothing changes.
pub fn try_init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_current_span(true)
        .with_target(false)
        .try_init()
        .is_ok()
}

/// Like [`try_init`], ignoring whether a subscriber was already present.
pub fn init() {
    let _ = try_init();
}
