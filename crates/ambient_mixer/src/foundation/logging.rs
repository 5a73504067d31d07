//! Logging utilities
//!
//! The crate logs through the `log` facade. Hosts that do not install their
//! own logger can call [`init`] (or [`try_init`] in tests) to route records
//! through `env_logger`, filtered by `RUST_LOG`.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// # Panics
/// Panics if a global logger has already been installed.
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system, ignoring an already-installed logger
pub fn try_init() -> bool {
    env_logger::builder().is_test(cfg!(test)).try_init().is_ok()
}
