//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with a fallback filter used when `RUST_LOG` is unset
///
/// Returns `false` if a logger was already installed.
pub fn init_with_level(level: &str) -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init()
        .is_ok()
}
