//! Play queue
//!
//! Songs are kept in list order. A separate play order (identity, or a
//! shuffled permutation) decides what "next" and "previous" mean, and a
//! cursor points into that play order.
//!
//! ```text
//! songs: [A, B, C, D]        (list order, as handed to the engine)
//! order: [2, 0, 3, 1]        (shuffled play order)
//! cursor:     ^              current = songs[order[1]] = A
//! ```

use crate::shuffle::{list_order, shuffled_order};
use cadence_core::{Song, SongId};

/// Ordered list of songs with a play cursor
#[derive(Debug, Clone, Default)]
pub struct PlayQueue {
    songs: Vec<Song>,
    order: Vec<usize>,
    cursor: usize,
    shuffled: bool,
}

impl PlayQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of songs
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether the queue has no songs
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Songs in list order
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Whether the play order is shuffled
    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// Song under the cursor
    pub fn current(&self) -> Option<&Song> {
        self.order.get(self.cursor).map(|&i| &self.songs[i])
    }

    /// Replace the songs
    ///
    /// If the current song is still present the cursor follows it and this
    /// returns `true`; otherwise the cursor goes to the start of the new play
    /// order and this returns `false`.
    pub fn replace(&mut self, songs: Vec<Song>) -> bool {
        let current_id = self.current().map(|s| s.id);
        let keep = current_id.and_then(|id| songs.iter().position(|s| s.id == id));

        self.songs = songs;
        self.order = if self.shuffled {
            shuffled_order(self.songs.len(), keep)
        } else {
            list_order(self.songs.len())
        };
        self.cursor = keep
            .and_then(|i| self.order.iter().position(|&o| o == i))
            .unwrap_or(0);

        keep.is_some()
    }

    /// Position of a song in list order
    pub fn position_of(&self, id: SongId) -> Option<usize> {
        self.songs.iter().position(|s| s.id == id)
    }

    /// Whether advancing would find a song
    pub fn has_next(&self, wrap: bool) -> bool {
        !self.order.is_empty() && (self.cursor + 1 < self.order.len() || wrap)
    }

    /// Move to the next song in play order
    ///
    /// At the end, wraps to the start when `wrap` is set, otherwise stays put
    /// and returns `None`.
    pub fn advance(&mut self, wrap: bool) -> Option<&Song> {
        if self.order.is_empty() {
            return None;
        }
        if self.cursor + 1 < self.order.len() {
            self.cursor += 1;
        } else if wrap {
            self.cursor = 0;
        } else {
            return None;
        }
        self.current()
    }

    /// Move to the previous song in play order
    ///
    /// At the start, wraps to the end when `wrap` is set, otherwise stays put
    /// and returns `None`.
    pub fn retreat(&mut self, wrap: bool) -> Option<&Song> {
        if self.order.is_empty() {
            return None;
        }
        if self.cursor > 0 {
            self.cursor -= 1;
        } else if wrap {
            self.cursor = self.order.len() - 1;
        } else {
            return None;
        }
        self.current()
    }

    /// Drop the current song and move to the one that followed it
    ///
    /// Returns the new current song, or `None` when nothing follows (the
    /// cursor then rests on the last remaining song, if any).
    pub fn remove_current(&mut self, wrap: bool) -> Option<&Song> {
        if self.order.is_empty() {
            return None;
        }

        let removed = self.order.remove(self.cursor);
        self.songs.remove(removed);
        for index in &mut self.order {
            if *index > removed {
                *index -= 1;
            }
        }

        if self.order.is_empty() {
            self.cursor = 0;
            return None;
        }
        if self.cursor >= self.order.len() {
            if wrap {
                self.cursor = 0;
            } else {
                self.cursor = self.order.len() - 1;
                return None;
            }
        }
        self.current()
    }

    /// Switch shuffle on or off, keeping the current song current
    pub fn set_shuffled(&mut self, shuffled: bool) {
        if shuffled == self.shuffled {
            return;
        }
        let current = self.order.get(self.cursor).copied();
        self.shuffled = shuffled;

        if shuffled {
            self.order = shuffled_order(self.songs.len(), current);
            self.cursor = 0;
        } else {
            self.order = list_order(self.songs.len());
            self.cursor = current.unwrap_or(0);
        }
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.songs.clear();
        self.order.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: i64) -> Song {
        Song::new(SongId::new(id), format!("Song {id}"), "Artist", 120_000, format!("file:///{id}.mp3"))
    }

    fn queue_of(ids: &[i64]) -> PlayQueue {
        let mut queue = PlayQueue::new();
        queue.replace(ids.iter().map(|&id| song(id)).collect());
        queue
    }

    fn current_id(queue: &PlayQueue) -> Option<i64> {
        queue.current().map(|s| s.id.get())
    }

    #[test]
    fn advance_and_retreat_without_wrap() {
        let mut queue = queue_of(&[1, 2, 3]);
        assert_eq!(current_id(&queue), Some(1));

        assert_eq!(queue.advance(false).map(|s| s.id.get()), Some(2));
        assert_eq!(queue.advance(false).map(|s| s.id.get()), Some(3));
        assert!(queue.advance(false).is_none());
        assert_eq!(current_id(&queue), Some(3), "cursor stays on last");

        assert_eq!(queue.retreat(false).map(|s| s.id.get()), Some(2));
        queue.retreat(false);
        assert!(queue.retreat(false).is_none());
    }

    #[test]
    fn wrap_in_both_directions() {
        let mut queue = queue_of(&[1, 2]);
        assert_eq!(queue.retreat(true).map(|s| s.id.get()), Some(2));
        assert_eq!(queue.advance(true).map(|s| s.id.get()), Some(1));
    }

    #[test]
    fn replace_keeps_current_when_present() {
        let mut queue = queue_of(&[1, 2, 3]);
        queue.advance(false);

        assert!(queue.replace(vec![song(9), song(2), song(8)]));
        assert_eq!(current_id(&queue), Some(2));
        assert_eq!(queue.advance(false).map(|s| s.id.get()), Some(8));
    }

    #[test]
    fn replace_resets_when_current_is_gone() {
        let mut queue = queue_of(&[1, 2, 3]);
        queue.advance(false);

        assert!(!queue.replace(vec![song(4), song(5)]));
        assert_eq!(current_id(&queue), Some(4));
    }

    #[test]
    fn remove_current_moves_to_following_song() {
        let mut queue = queue_of(&[1, 2, 3]);
        queue.advance(false);

        assert_eq!(queue.remove_current(false).map(|s| s.id.get()), Some(3));
        assert_eq!(queue.len(), 2);
        assert!(queue.remove_current(false).is_none());
        assert_eq!(current_id(&queue), Some(1));
        assert!(queue.remove_current(false).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn remove_last_wraps_with_repeat_all() {
        let mut queue = queue_of(&[1, 2, 3]);
        queue.advance(false);
        queue.advance(false);

        assert_eq!(queue.remove_current(true).map(|s| s.id.get()), Some(1));
    }

    #[test]
    fn shuffle_keeps_current_and_unshuffle_restores_list_order() {
        let mut queue = queue_of(&[1, 2, 3, 4, 5, 6]);
        queue.advance(false);
        queue.advance(false);

        queue.set_shuffled(true);
        assert!(queue.is_shuffled());
        assert_eq!(current_id(&queue), Some(3));

        let mut seen = vec![3];
        while let Some(song) = queue.advance(false) {
            seen.push(song.id.get());
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);

        let last = current_id(&queue);
        queue.set_shuffled(false);
        assert_eq!(current_id(&queue), last);
        let ids: Vec<_> = queue.songs().iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }
}
