/// Library-specific errors
use thiserror::Error;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Library error types
#[derive(Error, Debug)]
pub enum LibraryError {
    /// A file could not be turned into a song
    #[error("Unreadable media file {path}: {reason}")]
    UnreadableFile { path: String, reason: String },

    /// Media scan task failed to complete
    #[error("Media scan failed: {0}")]
    ScanFailed(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

impl From<LibraryError> for cadence_core::CadenceError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::Io(e) => Self::Io(e),
            other => Self::library(other.to_string()),
        }
    }
}
