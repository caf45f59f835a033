//! Logging setup.
//!
//! Logs go to stderr so stdout stays clean for reports and `--json` output.
//! The level comes from `SALES_LOG`, then `RUST_LOG`, then the default.

use tracing_subscriber::EnvFilter;

/// Env var checked before `RUST_LOG`.
pub const LOG_ENV: &str = "SALES_LOG";

/// Install the global subscriber.
///
/// `verbose` raises the fallback level from `warn` to `debug`. Calling this
/// twice (e.g. from tests) is harmless.
pub fn init(verbose: bool) {
    let fallback = if verbose { "sales_yoy=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
