//! Shared tracing setup for the workspace binaries.
//!
//! Output goes to stderr so command output on stdout stays pipeable.
//! `RUST_LOG` overrides the default filter.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str =
    "sahayak=info,api_client=info,query_cache=info,settings_loader=info,simulators=info";

/// Installs the global subscriber. Calling it twice is a no-op.
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Installs the global subscriber, falling back to `default_filter`.
pub fn init_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    if result.is_ok() {
        tracing::debug!("logger initialised");
    }
}
