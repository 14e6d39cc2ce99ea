//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global tracing subscriber filtered by `RUST_LOG`.
///
/// Falls back to `info` when `RUST_LOG` is unset. Safe to call more than
/// once; only the first call installs a subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// Installs a global tracing subscriber that emits JSON lines.
pub fn init_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().json().with_env_filter(filter).try_init();
}
