//! Logging init. Logs go to stderr so cards on stdout stay pipeable.

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise warnings only, or debug output for our crates with `-v`.
pub fn init(verbose: bool) {
    let default = if verbose { "warn,weather_core=debug,weather=debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
