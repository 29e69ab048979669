//! Harness errors.

use std::io;
use std::path::PathBuf;

/// Errors raised while configuring or running a playtest batch.
#[derive(Debug, thiserror::Error)]
pub enum PlaytestError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The config file is not valid JSON for [`PlaytestConfig`](crate::PlaytestConfig).
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The config parsed but describes an impossible batch.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The engine rejected a game.
    #[error(transparent)]
    Engine(#[from] delve_core::Error),
}
