//! Playlists screen state
//!
//! Mirrors every playlist (with songs) from the store, the device songs
//! offered in the add-songs dialog, and the screen's own flags: edit mode,
//! multi-select, the selected ids, the open dialog and the expanded card.
//!
//! Intents write through the repository and then re-read, so the published
//! state already reflects a write by the time the intent returns. A
//! background task also follows the store's live query, which picks up
//! writes made from other screens.

use crate::reorder;
use crate::selection::PlaybackSelection;
use crate::tasks::TaskScope;
use cadence_core::{CadenceError, Playlist, PlaylistId, PlaylistWithSongs, Result, Song, SongId};
use cadence_library::MusicRepository;
use serde::Serialize;
use std::collections::BTreeSet;
use tokio::sync::watch;

/// Which dialog is open on the playlists screen
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum PlaylistDialog {
    #[default]
    Hidden,
    Create,
    Rename(Playlist),
    DeleteConfirm(Playlist),
    AddSongs(PlaylistId),
}

/// Published playlists screen state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlaylistsUiState {
    /// Playlists in display order
    pub playlists: Vec<PlaylistWithSongs>,

    /// Device songs available to add
    pub local_songs: Vec<Song>,

    pub is_edit_mode: bool,
    pub is_multi_select: bool,
    pub selected_ids: BTreeSet<PlaylistId>,
    pub dialog: PlaylistDialog,

    /// Playlist whose songs are shown inline
    pub expanded_id: Option<PlaylistId>,
}

impl PlaylistsUiState {
    /// Find a playlist by id
    pub fn playlist(&self, id: PlaylistId) -> Option<&PlaylistWithSongs> {
        self.playlists.iter().find(|p| p.playlist.id == id)
    }
}

/// Playlists screen view-state
pub struct PlaylistsViewState {
    repository: MusicRepository,
    selection: PlaybackSelection,
    state: watch::Sender<PlaylistsUiState>,
    tasks: TaskScope,
}

impl PlaylistsViewState {
    /// Load the initial state and start following the store
    ///
    /// # Errors
    /// Returns an error if the initial playlist read fails. A failing device
    /// scan only leaves `local_songs` empty.
    pub async fn new(repository: MusicRepository, selection: PlaybackSelection) -> Result<Self> {
        let (state, _) = watch::channel(PlaylistsUiState::default());
        let view = Self {
            repository,
            selection,
            state,
            tasks: TaskScope::new(),
        };

        view.reload_playlists().await?;
        if let Err(e) = view.refresh_local_songs().await {
            tracing::warn!(error = %e, "Device scan failed");
        }

        let mut live = view.repository.watch_playlists();
        let state = view.state.clone();
        view.tasks.spawn(async move {
            while let Some(result) = live.changed().await {
                match result {
                    Ok(playlists) => state.send_modify(|s| s.playlists = playlists),
                    Err(e) => tracing::error!(error = %e, "Failed to reload playlists"),
                }
            }
        });

        Ok(view)
    }

    /// Latest state
    pub fn state(&self) -> PlaylistsUiState {
        self.state.borrow().clone()
    }

    /// Observe the state
    pub fn subscribe(&self) -> watch::Receiver<PlaylistsUiState> {
        self.state.subscribe()
    }

    /// Re-read all playlists from the store
    pub async fn reload_playlists(&self) -> Result<()> {
        let playlists = self.repository.watch_playlists().current().await?;
        self.state.send_modify(|s| s.playlists = playlists);
        Ok(())
    }

    /// Re-scan the device for songs to offer
    pub async fn refresh_local_songs(&self) -> Result<()> {
        let songs = self.repository.local_songs().await?;
        self.state.send_modify(|s| s.local_songs = songs);
        Ok(())
    }

    /// Create a playlist and close the dialog
    ///
    /// # Errors
    /// Returns `InvalidInput` for a blank name.
    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let name = non_blank(name)?;
        let playlist = self.repository.create_playlist(name).await?;
        self.set_dialog(PlaylistDialog::Hidden);
        self.reload_playlists().await?;
        Ok(playlist)
    }

    /// Rename a playlist and close the dialog
    pub async fn rename_playlist(&self, id: PlaylistId, name: &str) -> Result<()> {
        let name = non_blank(name)?;
        self.repository.rename_playlist(id, name).await?;
        self.set_dialog(PlaylistDialog::Hidden);
        self.reload_playlists().await
    }

    /// Delete one playlist and close the dialog
    pub async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        self.repository.delete_playlist(id).await?;
        self.forget_deleted(&[id]);
        self.set_dialog(PlaylistDialog::Hidden);
        self.reload_playlists().await
    }

    /// Delete every selected playlist as one batch and leave multi-select
    ///
    /// Returns the playlists that were deleted.
    pub async fn delete_selected(&self) -> Result<Vec<Playlist>> {
        let ids: Vec<PlaylistId> = self.state.borrow().selected_ids.iter().copied().collect();
        let deleted = self.repository.delete_playlists(&ids).await?;
        self.forget_deleted(&ids);
        self.toggle_multi_select();
        self.reload_playlists().await?;
        Ok(deleted)
    }

    /// Add songs to a playlist and close the dialog
    ///
    /// Returns how many songs were newly added.
    pub async fn add_songs(&self, playlist_id: PlaylistId, songs: &[Song]) -> Result<usize> {
        let added = self.repository.add_songs_to_playlist(playlist_id, songs).await?;
        self.set_dialog(PlaylistDialog::Hidden);
        self.reload_playlists().await?;
        Ok(added)
    }

    /// Remove one song from a playlist
    pub async fn remove_song(&self, playlist_id: PlaylistId, song_id: SongId) -> Result<()> {
        self.repository.remove_song_from_playlist(playlist_id, song_id).await?;
        self.reload_playlists().await
    }

    /// Drag a playlist from one position to another
    pub async fn move_playlist(&self, from: usize, to: usize) -> Result<()> {
        let orders = {
            let state = self.state.borrow();
            let playlists: Vec<Playlist> = state.playlists.iter().map(|p| p.playlist.clone()).collect();
            reorder::reordered_playlists(&playlists, from, to)?
        };
        self.repository.update_playlist_orders(&orders).await?;
        self.reload_playlists().await
    }

    /// Drag a song within a playlist
    ///
    /// Positions refer to the songs in display order.
    pub async fn move_song(&self, playlist_id: PlaylistId, from: usize, to: usize) -> Result<()> {
        let memberships = {
            let state = self.state.borrow();
            let playlist = state
                .playlist(playlist_id)
                .ok_or(CadenceError::PlaylistNotFound(playlist_id))?;
            reorder::reordered_memberships(playlist_id, &playlist.songs_in_display_order(), from, to)?
        };
        self.repository.update_membership_orders(&memberships).await?;
        self.reload_playlists().await
    }

    /// Enter or leave edit mode; leaving also ends multi-select
    pub fn set_edit_mode(&self, enabled: bool) {
        self.state.send_modify(|s| {
            s.is_edit_mode = enabled;
            if !enabled {
                s.is_multi_select = false;
                s.selected_ids.clear();
            }
        });
    }

    /// Flip multi-select, dropping any selection
    pub fn toggle_multi_select(&self) {
        self.state.send_modify(|s| {
            s.is_multi_select = !s.is_multi_select;
            s.selected_ids.clear();
        });
    }

    /// Add or remove a playlist from the multi-selection
    pub fn toggle_selection(&self, id: PlaylistId) {
        self.state.send_modify(|s| {
            if !s.selected_ids.remove(&id) {
                s.selected_ids.insert(id);
            }
        });
    }

    pub fn set_dialog(&self, dialog: PlaylistDialog) {
        self.state.send_modify(|s| s.dialog = dialog);
    }

    /// Expand a playlist, or collapse it if it is already expanded
    pub fn toggle_expanded(&self, id: PlaylistId) {
        self.state.send_modify(|s| {
            s.expanded_id = if s.expanded_id == Some(id) { None } else { Some(id) };
        });
    }

    /// Make a playlist (or `None`: device songs) the source of the play queue
    pub fn select_for_playback(&self, id: Option<PlaylistId>) {
        self.selection.select(id);
    }

    fn forget_deleted(&self, ids: &[PlaylistId]) {
        if self.selection.active().is_some_and(|active| ids.contains(&active)) {
            self.selection.select(None);
        }
        self.state.send_modify(|s| {
            if s.expanded_id.is_some_and(|e| ids.contains(&e)) {
                s.expanded_id = None;
            }
        });
    }
}

fn non_blank(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CadenceError::invalid_input("playlist name must not be blank"));
    }
    Ok(name)
}
