/// Playlist domain types
use crate::types::{PlaylistId, Song, SongId};
use serde::{Deserialize, Serialize};

/// Playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Store-assigned identifier
    pub id: PlaylistId,

    /// Playlist name (free text, not unique)
    pub name: String,

    /// Position in the user-controlled playlist ordering
    pub display_order: i64,
}

impl Playlist {
    /// Create a playlist value (for database loading)
    pub fn new(id: PlaylistId, name: impl Into<String>, display_order: i64) -> Self {
        Self {
            id,
            name: name.into(),
            display_order,
        }
    }
}

/// Playlist/song association with its own position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Membership {
    /// Playlist ID
    pub playlist_id: PlaylistId,

    /// Song ID
    pub song_id: SongId,

    /// Position within the playlist (0-indexed after any reorder)
    pub display_order: i64,
}

impl Membership {
    /// Create a new membership
    pub fn new(playlist_id: PlaylistId, song_id: SongId, display_order: i64) -> Self {
        Self {
            playlist_id,
            song_id,
            display_order,
        }
    }
}

/// A playlist together with its member songs
///
/// `songs` keeps store-native (insertion) order. Screens that render a
/// user-ordered list use [`PlaylistWithSongs::songs_in_display_order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistWithSongs {
    /// The playlist row
    pub playlist: Playlist,

    /// Member songs in store-native order
    pub songs: Vec<Song>,

    /// Membership rows for this playlist, same order as `songs`
    pub memberships: Vec<Membership>,
}

impl PlaylistWithSongs {
    /// Member songs sorted by their membership order
    ///
    /// Songs with equal order keep their store-native relative order.
    pub fn songs_in_display_order(&self) -> Vec<Song> {
        let mut ordered: Vec<(i64, &Song)> = self
            .songs
            .iter()
            .map(|song| (self.order_of(song.id).unwrap_or(i64::MAX), song))
            .collect();
        ordered.sort_by_key(|(order, _)| *order);
        ordered.into_iter().map(|(_, song)| song.clone()).collect()
    }

    /// Membership order for a song, if it belongs to this playlist
    pub fn order_of(&self, song_id: SongId) -> Option<i64> {
        self.memberships
            .iter()
            .find(|m| m.song_id == song_id)
            .map(|m| m.display_order)
    }

    /// Whether the playlist contains a song
    pub fn contains(&self, song_id: SongId) -> bool {
        self.memberships.iter().any(|m| m.song_id == song_id)
    }
}
