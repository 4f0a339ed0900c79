//! Tracing subscriber setup for binaries and tests embedding the engine.
//!
//! The library only emits `tracing` events; with no subscriber installed they
//! cost nothing and change nothing.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a formatted subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (e.g. `"markdown_pdf_metadata=debug"`).
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
