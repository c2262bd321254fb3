//! Frame construction errors.

use thiserror::Error;

/// Result alias for frame operations.
pub type Result<T> = std::result::Result<T, FrameError>;

/// Errors raised while building a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The payload buffer could not be reserved.
    #[error("failed to allocate {size} byte frame payload")]
    AllocationFailed {
        /// Requested payload size in bytes
        size: usize,
    },
}
