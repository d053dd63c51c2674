//! Device media scan
//!
//! [`DirectoryMediaIndex`] walks the configured music directories and turns
//! every supported audio file into a [`Song`]. Each scan is a fresh snapshot;
//! nothing is cached between calls.

use crate::error::{LibraryError, Result};
use cadence_core::{MediaIndex, Song, SongId};
use lofty::{Accessor, AudioFile, TaggedFileExt};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Artist shown when a file has no artist tag
pub const UNKNOWN_ARTIST: &str = "<unknown>";

/// Scan configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directories to scan recursively
    pub directories: Vec<PathBuf>,

    /// Supported audio file extensions (lowercase)
    pub extensions: Vec<String>,

    /// Shortest item considered music (inclusive)
    pub min_duration: Duration,

    /// Longest item considered music (inclusive)
    pub max_duration: Duration,

    /// Follow symbolic links while walking
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            directories: Vec::new(),
            extensions: ["mp3", "flac", "ogg", "opus", "wav", "m4a", "aac"]
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
            min_duration: Duration::from_secs(30),
            max_duration: Duration::from_secs(60 * 60),
            follow_links: false,
        }
    }
}

impl ScanConfig {
    /// Scan the given directories with the default filters
    pub fn with_directories(directories: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            directories: directories.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Whether a duration falls inside the music range
    pub fn accepts_duration(&self, duration: Duration) -> bool {
        duration >= self.min_duration && duration <= self.max_duration
    }

    fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }
}

/// Filesystem-backed media index
#[derive(Debug, Clone, Default)]
pub struct DirectoryMediaIndex {
    config: ScanConfig,
}

impl DirectoryMediaIndex {
    /// Create an index over the configured directories
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan configuration in use
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Collect candidate audio files below every configured directory
    ///
    /// Missing directories are skipped with a warning.
    fn discover_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for root in &self.config.directories {
            if !root.exists() {
                tracing::warn!(path = %root.display(), "Music directory does not exist, skipping");
                continue;
            }

            for entry in walkdir::WalkDir::new(root)
                .follow_links(self.config.follow_links)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if entry.file_type().is_file() && self.config.is_supported_file(path) {
                    files.push(path.to_path_buf());
                }
            }
        }

        files
    }

    /// Read one file; `Ok(None)` when its duration is outside the music range
    fn read_song(&self, path: &Path) -> Result<Option<Song>> {
        let tagged_file = lofty::read_from_path(path)?;
        let duration = tagged_file.properties().duration();
        if !self.config.accepts_duration(duration) {
            return Ok(None);
        }

        let canonical = path.canonicalize()?;
        let uri = url::Url::from_file_path(&canonical).map_err(|()| LibraryError::UnreadableFile {
            path: canonical.display().to_string(),
            reason: "path cannot be expressed as a file URL".to_string(),
        })?;

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.tags().first());

        let title = tag
            .and_then(|t| t.title().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| file_stem(path));
        let artist = tag
            .and_then(|t| t.artist().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
        let album = tag
            .and_then(|t| t.album().map(|s| s.trim().to_string()))
            .unwrap_or_default();

        Ok(Some(
            Song::new(
                song_id_for_path(&canonical),
                title,
                artist,
                duration.as_millis() as u64,
                uri.to_string(),
            )
            .with_album(album),
        ))
    }
}

impl MediaIndex for DirectoryMediaIndex {
    fn scan(&self) -> cadence_core::Result<Vec<Song>> {
        let files = self.discover_files();
        let mut songs = Vec::with_capacity(files.len());
        let mut skipped = 0usize;

        for path in &files {
            match self.read_song(path) {
                Ok(Some(song)) => songs.push(song),
                Ok(None) => skipped += 1,
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable media file");
                }
            }
        }

        songs.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

        tracing::debug!(
            discovered = files.len(),
            songs = songs.len(),
            skipped,
            "Media scan complete"
        );
        Ok(songs)
    }
}

/// Stable id for a file: first 8 bytes of SHA-256 over the path, kept positive
pub fn song_id_for_path(path: &Path) -> SongId {
    let digest = Sha256::digest(path.to_string_lossy().as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    SongId::new(i64::from_be_bytes(bytes) & i64::MAX)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_bounds_are_inclusive() {
        let config = ScanConfig::default();
        assert!(!config.accepts_duration(Duration::from_millis(29_999)));
        assert!(config.accepts_duration(Duration::from_secs(30)));
        assert!(config.accepts_duration(Duration::from_secs(3600)));
        assert!(!config.accepts_duration(Duration::from_millis(3_600_001)));
    }

    #[test]
    fn extension_match_ignores_case() {
        let config = ScanConfig::default();
        assert!(config.is_supported_file(Path::new("/m/a.FLAC")));
        assert!(config.is_supported_file(Path::new("/m/b.mp3")));
        assert!(!config.is_supported_file(Path::new("/m/cover.jpg")));
        assert!(!config.is_supported_file(Path::new("/m/README")));
    }

    #[test]
    fn path_ids_are_stable_and_non_negative() {
        let a = song_id_for_path(Path::new("/music/a.mp3"));
        assert_eq!(a, song_id_for_path(Path::new("/music/a.mp3")));
        assert_ne!(a, song_id_for_path(Path::new("/music/b.mp3")));
        assert!(!a.is_builtin());
    }

    #[test]
    fn missing_directory_scans_empty() {
        let index = DirectoryMediaIndex::new(ScanConfig::with_directories(["/definitely/not/here"]));
        assert!(index.scan().unwrap().is_empty());
    }
}
