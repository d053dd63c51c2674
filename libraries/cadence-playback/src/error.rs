//! Error types for the playback engine

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,

    /// The backend refused a command
    #[error("Player backend error: {0}")]
    Backend(String),

    /// Media could not be opened or decoded
    #[error("Unplayable media: {0}")]
    Unplayable(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

impl From<PlaybackError> for cadence_core::CadenceError {
    fn from(err: PlaybackError) -> Self {
        cadence_core::CadenceError::playback(err.to_string())
    }
}
