//! Logging bootstrap.

use env_logger::Env;

/// Installs the global logger once; later calls are ignored.
///
/// Defaults to `info`, overridable through `RUST_LOG`.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
