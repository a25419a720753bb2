//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::GlobalArgs;

/// Returns the default filter directive for the global flags.
///
/// `--quiet` wins over `--verbose`.
pub fn default_directive(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "info"
    }
}

/// Installs a stderr `fmt` subscriber. `RUST_LOG` overrides the flags.
pub fn init(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(global)));
    // A subscriber may already be installed (e.g., by a test harness).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
