//! All-songs screen state: the device scan, re-run on demand

use crate::tasks::TaskScope;
use cadence_core::{Result, Song};
use cadence_library::MusicRepository;
use serde::Serialize;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AllSongsUiState {
    /// Device songs sorted by title
    pub songs: Vec<Song>,
    pub is_loading: bool,
}

/// All-songs screen view-state
pub struct AllSongsViewState {
    repository: MusicRepository,
    state: watch::Sender<AllSongsUiState>,
    tasks: TaskScope,
}

impl AllSongsViewState {
    /// Create the view-state and start the first scan in the background
    pub fn new(repository: MusicRepository) -> Self {
        let (state, _) = watch::channel(AllSongsUiState::default());
        let view = Self {
            repository,
            state,
            tasks: TaskScope::new(),
        };

        let repository = view.repository.clone();
        let state = view.state.clone();
        view.tasks.spawn(async move {
            if let Err(e) = scan_into(&repository, &state).await {
                tracing::warn!(error = %e, "Initial device scan failed");
            }
        });
        view
    }

    pub fn state(&self) -> AllSongsUiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AllSongsUiState> {
        self.state.subscribe()
    }

    /// Re-scan the device
    pub async fn refresh(&self) -> Result<()> {
        scan_into(&self.repository, &self.state).await
    }
}

async fn scan_into(repository: &MusicRepository, state: &watch::Sender<AllSongsUiState>) -> Result<()> {
    state.send_modify(|s| s.is_loading = true);
    let result = repository.local_songs().await;
    state.send_modify(|s| {
        s.is_loading = false;
        if let Ok(songs) = &result {
            s.songs.clone_from(songs);
        }
    });
    result.map(|_| ())
}
