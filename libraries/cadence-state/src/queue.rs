//! Play-queue assembly
//!
//! The queue is rebuilt from scratch whenever its inputs change: built-in
//! tracks first (when enabled), then the active playlist in display order,
//! or every device song when no playlist is active. Songs in the failed set
//! are always left out.

use crate::selection::PlaybackSelection;
use cadence_core::{Result, Song};
use cadence_library::MusicRepository;
use cadence_playback::FailedTracks;
use cadence_storage::SettingsStore;

/// Everything the queue is derived from
#[derive(Clone)]
pub struct QueueSource {
    repository: MusicRepository,
    settings: SettingsStore,
    selection: PlaybackSelection,
    failed: FailedTracks,
}

impl QueueSource {
    pub fn new(
        repository: MusicRepository,
        settings: SettingsStore,
        selection: PlaybackSelection,
        failed: FailedTracks,
    ) -> Self {
        Self {
            repository,
            settings,
            selection,
            failed,
        }
    }

    pub fn repository(&self) -> &MusicRepository {
        &self.repository
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn selection(&self) -> &PlaybackSelection {
        &self.selection
    }

    pub fn failed(&self) -> &FailedTracks {
        &self.failed
    }

    /// Build the queue for the current inputs
    ///
    /// A selected playlist that no longer exists contributes nothing.
    ///
    /// # Errors
    /// Returns an error if the store or the device scan fails.
    pub async fn assemble(&self) -> Result<Vec<Song>> {
        let mut songs = Vec::new();
        if self.settings.built_in_music_enabled() {
            songs.extend(self.repository.builtin_songs());
        }

        match self.selection.active() {
            Some(id) => {
                if let Some(playlist) = self.repository.playlist_with_songs(id).await? {
                    songs.extend(playlist.songs_in_display_order());
                } else {
                    tracing::debug!(playlist = %id, "Active playlist no longer exists");
                }
            }
            None => songs.extend(self.repository.local_songs().await?),
        }

        let failed = self.failed.snapshot();
        songs.retain(|song| !failed.contains(&song.id));
        Ok(songs)
    }
}
