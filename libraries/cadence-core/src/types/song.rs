/// Song domain type
use crate::types::SongId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// A single playable song
///
/// Songs are immutable once created. Device songs are re-derived from a media
/// scan on every load and only cached in the store as a side effect of being
/// added to a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Stable device-media id, or a negative constant for built-in tracks
    pub id: SongId,

    /// Song title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (often empty)
    pub album: String,

    /// Duration in milliseconds
    pub duration_ms: u64,

    /// Content locator (`file://` path or remote URL)
    pub uri: String,
}

impl Song {
    /// Create a song with an empty album
    pub fn new(
        id: SongId,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_ms: u64,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            album: String::new(),
            duration_ms,
            uri: uri.into(),
        }
    }

    /// Set the album name
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Duration as a `Duration`
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Whether this is one of the built-in fallback tracks
    pub fn is_builtin(&self) -> bool {
        self.id.is_builtin()
    }

    /// Local file path for `file://` locators
    ///
    /// Returns `None` for remote URLs or unparseable locators.
    pub fn local_path(&self) -> Option<PathBuf> {
        let url = url::Url::parse(&self.uri).ok()?;
        if url.scheme() != "file" {
            return None;
        }
        url.to_file_path().ok()
    }

    /// Whether the locator points at a remote resource
    pub fn is_remote(&self) -> bool {
        url::Url::parse(&self.uri)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_uri_resolves_to_local_path() {
        let song = Song::new(SongId::new(1), "A", "B", 60_000, "file:///music/a.mp3");
        assert_eq!(song.local_path(), Some(PathBuf::from("/music/a.mp3")));
        assert!(!song.is_remote());
    }

    #[test]
    fn remote_uri_has_no_local_path() {
        let song = Song::new(
            SongId::new(-1),
            "Jazz In Paris",
            "Media Right Productions",
            103_000,
            "https://example.com/jazz.mp3",
        );
        assert_eq!(song.local_path(), None);
        assert!(song.is_remote());
        assert!(song.is_builtin());
    }

    #[test]
    fn duration_conversion() {
        let song = Song::new(SongId::new(3), "t", "a", 1_500, "file:///x.mp3");
        assert_eq!(song.duration(), Duration::from_millis(1_500));
    }
}
