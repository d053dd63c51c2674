//! Drag-to-reorder helpers
//!
//! A drag is remove-at-`from`, insert-at-`to`. Afterwards every item gets
//! its index as the new order, so orders are always contiguous from 0.

use cadence_core::{CadenceError, Membership, Playlist, PlaylistId, Result, Song};

/// Move one item within a list
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    if from >= items.len() || to >= items.len() {
        return Err(CadenceError::invalid_input(format!(
            "cannot move item {from} to {to} in a list of {}",
            items.len()
        )));
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

/// New playlist orders after a drag, as `(id, order)` pairs
pub fn reordered_playlists(playlists: &[Playlist], from: usize, to: usize) -> Result<Vec<(PlaylistId, i64)>> {
    let mut ids: Vec<PlaylistId> = playlists.iter().map(|p| p.id).collect();
    move_item(&mut ids, from, to)?;
    Ok(ids
        .into_iter()
        .enumerate()
        .map(|(index, id)| (id, index as i64))
        .collect())
}

/// New memberships after dragging a song within a playlist
///
/// `songs` must be in the order shown on screen.
pub fn reordered_memberships(playlist_id: PlaylistId, songs: &[Song], from: usize, to: usize) -> Result<Vec<Membership>> {
    let mut ids: Vec<_> = songs.iter().map(|s| s.id).collect();
    move_item(&mut ids, from, to)?;
    Ok(ids
        .into_iter()
        .enumerate()
        .map(|(index, song_id)| Membership::new(playlist_id, song_id, index as i64))
        .collect())
}
