//! Repository facade
//!
//! Single entry point for screens and view-states: the playlist store, the
//! device media index, the deletion audit log and the built-in tracks.

use crate::audit::AuditLog;
use crate::builtin;
use crate::error::LibraryError;
use cadence_core::{error::Result, types::*, MediaIndex};
use cadence_storage::{LibraryStore, LiveQuery};
use std::sync::Arc;

/// Facade over store, media index and audit log
///
/// Cheap to clone; clones share the same store and index.
#[derive(Clone)]
pub struct MusicRepository {
    store: LibraryStore,
    index: Arc<dyn MediaIndex>,
    audit: AuditLog,
}

impl MusicRepository {
    /// Build a repository from its parts
    pub fn new(store: LibraryStore, index: Arc<dyn MediaIndex>, audit: AuditLog) -> Self {
        Self { store, index, audit }
    }

    /// Underlying store
    pub fn store(&self) -> &LibraryStore {
        &self.store
    }

    /// Audit log in use
    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    // Reads

    /// Live view of every playlist with its songs
    pub fn watch_playlists(&self) -> LiveQuery<Vec<PlaylistWithSongs>> {
        self.store.watch_playlists()
    }

    /// Live view of one playlist with its songs
    pub fn watch_playlist(&self, id: PlaylistId) -> LiveQuery<Option<PlaylistWithSongs>> {
        self.store.watch_playlist(id)
    }

    /// One playlist with its songs, now
    pub async fn playlist_with_songs(&self, id: PlaylistId) -> Result<Option<PlaylistWithSongs>> {
        self.store.playlist_with_songs(id).await
    }

    /// Every membership row
    pub async fn memberships(&self) -> Result<Vec<Membership>> {
        self.store.memberships().await
    }

    /// A single membership row
    pub async fn membership(&self, playlist_id: PlaylistId, song_id: SongId) -> Result<Option<Membership>> {
        self.store.membership(playlist_id, song_id).await
    }

    /// The fixed built-in track list
    pub fn builtin_songs(&self) -> Vec<Song> {
        builtin::builtin_songs()
    }

    /// Scan the device for music, sorted by title
    ///
    /// The scan is blocking and runs on the blocking thread pool.
    pub async fn local_songs(&self) -> Result<Vec<Song>> {
        let index = Arc::clone(&self.index);
        tokio::task::spawn_blocking(move || index.scan())
            .await
            .map_err(|e| LibraryError::ScanFailed(e.to_string()))?
    }

    // Writes

    /// Create a playlist at the end of the manual ordering
    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        self.store.create_playlist(name).await
    }

    /// Rename a playlist
    pub async fn rename_playlist(&self, id: PlaylistId, name: &str) -> Result<()> {
        self.store.rename_playlist(id, name).await
    }

    /// Rewrite playlist display orders in one transaction
    pub async fn update_playlist_orders(&self, orders: &[(PlaylistId, i64)]) -> Result<()> {
        self.store.update_playlist_orders(orders).await
    }

    /// Rewrite membership orders in one transaction
    pub async fn update_membership_orders(&self, memberships: &[Membership]) -> Result<()> {
        self.store.update_membership_orders(memberships).await
    }

    /// Delete one playlist, logging it first
    pub async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        self.delete_playlists(&[id]).await.map(|_| ())
    }

    /// Delete playlists by id, logging the whole batch first
    ///
    /// Ids that do not exist are ignored and not logged. Returns the
    /// playlists that were deleted.
    pub async fn delete_playlists(&self, ids: &[PlaylistId]) -> Result<Vec<Playlist>> {
        let doomed = self.store.playlists_by_ids(ids).await?;
        if doomed.is_empty() {
            return Ok(doomed);
        }

        self.audit.record_deletions(&doomed)?;

        let doomed_ids: Vec<PlaylistId> = doomed.iter().map(|p| p.id).collect();
        self.store.delete_playlists(&doomed_ids).await?;
        Ok(doomed)
    }

    /// Add songs to a playlist with `display_order = index in songs`
    ///
    /// Songs already in the playlist are left where they are.
    pub async fn add_songs_to_playlist(&self, playlist_id: PlaylistId, songs: &[Song]) -> Result<usize> {
        self.store.add_songs_to_playlist(playlist_id, songs).await
    }

    /// Remove a song from a playlist
    pub async fn remove_song_from_playlist(&self, playlist_id: PlaylistId, song_id: SongId) -> Result<()> {
        self.store.remove_song_from_playlist(playlist_id, song_id).await
    }
}
