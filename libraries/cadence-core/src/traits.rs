/// Core traits for Cadence
use crate::error::Result;
use crate::types::Song;

/// Read-only index of audio available on this device
///
/// Implementations scan synchronously and return a fresh snapshot on every
/// call; there is no caching or incremental update. Async callers should run
/// `scan` on a blocking thread.
pub trait MediaIndex: Send + Sync {
    /// Scan the index and return the music items sorted by title ascending
    ///
    /// # Errors
    /// Returns an error if the index itself cannot be read. Individual
    /// unreadable items are skipped, not reported.
    fn scan(&self) -> Result<Vec<Song>>;
}

impl<T: MediaIndex + ?Sized> MediaIndex for std::sync::Arc<T> {
    fn scan(&self) -> Result<Vec<Song>> {
        (**self).scan()
    }
}
