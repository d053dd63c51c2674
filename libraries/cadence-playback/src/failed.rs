//! Songs that failed to play this session

use cadence_core::SongId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Set of songs excluded from the play queue
///
/// The engine records every failure here itself, so nothing is lost when
/// event subscribers fall behind. Grows only; cleared by restarting the
/// process.
#[derive(Clone, Default)]
pub struct FailedTracks {
    ids: Arc<Mutex<HashSet<SongId>>>,
}

impl FailedTracks {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure; returns `false` if the song was already excluded
    pub fn insert(&self, id: SongId) -> bool {
        self.lock().insert(id)
    }

    /// Whether a song is excluded
    pub fn contains(&self, id: SongId) -> bool {
        self.lock().contains(&id)
    }

    /// Copy of the excluded ids
    pub fn snapshot(&self) -> HashSet<SongId> {
        self.lock().clone()
    }

    /// Number of excluded songs
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has failed yet
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether both handles point at the same set
    pub fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ids, &other.ids)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<SongId>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_tracks_grow_only() {
        let failed = FailedTracks::new();
        assert!(failed.is_empty());
        assert!(failed.insert(SongId::new(4)));
        assert!(!failed.insert(SongId::new(4)));
        assert!(failed.clone().contains(SongId::new(4)));
        assert_eq!(failed.len(), 1);
        assert_eq!(failed.snapshot(), HashSet::from([SongId::new(4)]));
    }

    #[test]
    fn clones_share_the_set() {
        let a = FailedTracks::new();
        assert!(a.shares_with(&a.clone()));
        assert!(!a.shares_with(&FailedTracks::new()));
    }
}
