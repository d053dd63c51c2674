//! Active-playlist selection
//!
//! Process-lifetime state shared between screens. It is created once at
//! startup and handed to whoever needs it; nothing here is global and
//! nothing is persisted.

use cadence_core::PlaylistId;
use std::sync::Arc;
use tokio::sync::watch;

/// Which playlist feeds the play queue (`None`: device songs)
#[derive(Clone)]
pub struct PlaybackSelection {
    active: Arc<watch::Sender<Option<PlaylistId>>>,
}

impl Default for PlaybackSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSelection {
    /// Start with nothing selected
    pub fn new() -> Self {
        let (active, _) = watch::channel(None);
        Self {
            active: Arc::new(active),
        }
    }

    /// Currently selected playlist
    pub fn active(&self) -> Option<PlaylistId> {
        *self.active.borrow()
    }

    /// Select a playlist, or `None` for device songs
    ///
    /// Observers are only woken when the selection actually changes.
    pub fn select(&self, playlist: Option<PlaylistId>) {
        let changed = self.active.send_if_modified(|current| {
            let changed = *current != playlist;
            *current = playlist;
            changed
        });
        if changed {
            tracing::debug!(?playlist, "Playback selection changed");
        }
    }

    /// Observe the selection
    pub fn subscribe(&self) -> watch::Receiver<Option<PlaylistId>> {
        self.active.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn selection_notifies_on_change_only() {
        let selection = PlaybackSelection::new();
        let mut rx = selection.subscribe();
        assert_eq!(*rx.borrow_and_update(), None);

        selection.select(Some(PlaylistId::new(3)));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Some(PlaylistId::new(3)));

        selection.select(Some(PlaylistId::new(3)));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(selection.active(), Some(PlaylistId::new(3)));
    }

    #[test]
    fn clones_share_selection() {
        let a = PlaybackSelection::new();
        let b = a.clone();
        b.select(Some(PlaylistId::new(9)));
        assert_eq!(a.active(), Some(PlaylistId::new(9)));
    }
}
