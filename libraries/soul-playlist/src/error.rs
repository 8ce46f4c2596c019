//! Error types for playlist control

use thiserror::Error;

/// Playlist errors
///
/// Transport operations with nothing to act on are silent no-ops and never
/// produce an error. Failures reported by the audio resource reach observers
/// as [`PlaylistEvent::Error`](crate::PlaylistEvent::Error) instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    /// Item rejected by `add` (missing, non-string or empty source)
    #[error("Invalid playlist item: {0}")]
    InvalidItem(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for playlist operations
pub type Result<T> = std::result::Result<T, PlaylistError>;
