//! Deletion audit log
//!
//! Append-only text file recording every deleted playlist. Each deletion
//! batch gets one timestamped header followed by one line per playlist:
//!
//! ```text
//!
//! --- Deleted Playlists on 2024-03-01 09:15:42 ---
//! ID: 4, Name: Road Trip
//! ID: 9, Name: Sleep
//! ```

use crate::error::Result;
use cadence_core::Playlist;
use chrono::{DateTime, Local, TimeZone};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default file name inside the data directory
pub const AUDIT_FILE_NAME: &str = "deleted_playlists_log.txt";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only log of deleted playlists
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Log to `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one section for a deletion batch, stamped with local time
    ///
    /// An empty batch writes nothing.
    pub fn record_deletions(&self, playlists: &[Playlist]) -> Result<()> {
        self.record_deletions_at(&Local::now(), playlists)
    }

    /// Append one section for a deletion batch with an explicit timestamp
    pub fn record_deletions_at<Tz>(&self, at: &DateTime<Tz>, playlists: &[Playlist]) -> Result<()>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        if playlists.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(format_section(at, playlists).as_bytes())?;

        tracing::info!(
            count = playlists.len(),
            path = %self.path.display(),
            "Recorded playlist deletions"
        );
        Ok(())
    }
}

/// Render one audit section
pub fn format_section<Tz>(at: &DateTime<Tz>, playlists: &[Playlist]) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut section = format!("\n--- Deleted Playlists on {} ---\n", at.format(TIMESTAMP_FORMAT));
    for playlist in playlists {
        section.push_str(&format!("ID: {}, Name: {}\n", playlist.id, playlist.name));
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::PlaylistId;
    use chrono::Utc;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 42).unwrap()
    }

    #[test]
    fn section_format() {
        let playlists = vec![
            Playlist::new(PlaylistId::new(4), "Road Trip", 0),
            Playlist::new(PlaylistId::new(9), "Sleep", 1),
        ];
        assert_eq!(
            format_section(&at(), &playlists),
            "\n--- Deleted Playlists on 2024-03-01 09:15:42 ---\nID: 4, Name: Road Trip\nID: 9, Name: Sleep\n"
        );
    }

    #[test]
    fn batches_append() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join(AUDIT_FILE_NAME));

        log.record_deletions_at(&at(), &[Playlist::new(PlaylistId::new(1), "One", 0)])
            .unwrap();
        log.record_deletions_at(&at(), &[Playlist::new(PlaylistId::new(2), "Two", 0)])
            .unwrap();

        let text = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(text.matches("--- Deleted Playlists on").count(), 2);
        assert!(text.find("ID: 1, Name: One").unwrap() < text.find("ID: 2, Name: Two").unwrap());
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join(AUDIT_FILE_NAME));

        log.record_deletions(&[]).unwrap();
        assert!(!log.path().exists());
    }
}
