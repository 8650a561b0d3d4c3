//! Log output for hosts and demos.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a `tracing` subscriber that prints to stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Set
/// `RUST_LOG=roomdeck_connection=debug` to see dropped callbacks and
/// per-room reconciliation.
///
/// Call once, at startup. A second call leaves the first subscriber in
/// place and returns `false`.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .is_ok()
}
