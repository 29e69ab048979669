//! Error types for the core.
//!
//! Only precondition violations are errors. Ill-timed or invalid requests
//! (wrong battle phase, dead actor, out-of-bounds move) are absorbed by the
//! state machines as no-ops or narrative log entries and never surface here.

/// Fatal precondition violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `Engine::step` was called with no player entity on the grid.
    #[error("no player entity exists in the exploration engine")]
    MissingPlayer,

    /// The grid was configured with a non-positive dimension.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },
}

/// Result alias using the core [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
