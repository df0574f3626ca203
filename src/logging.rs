// 📝 Logging
//
// Installs the process-wide tracing subscriber. Verbosity comes from RUST_LOG
// (e.g. `RUST_LOG=agro_records=debug`); without it everything at info and
// above is printed.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the fmt subscriber. Calling it more than once is a no-op.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
