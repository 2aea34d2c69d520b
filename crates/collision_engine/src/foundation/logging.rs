//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Idempotent: when a logger is already installed (an earlier call, or a
/// binary that configured its own `env_logger::Builder`) the existing one
/// is kept.
pub fn init() {
    if env_logger::try_init().is_err() {
        debug!("Logger already installed, keeping it");
    }
}
