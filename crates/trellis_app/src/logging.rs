//! Logging bootstrap

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber filtered by `filter`.
///
/// `RUST_LOG` wins over `filter` when set. Calling this again, or after
/// another subscriber was installed, does nothing.
pub fn init(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
