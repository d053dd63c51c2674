//! Settings screen state

use crate::tasks::TaskScope;
use cadence_core::Result;
use cadence_storage::SettingsStore;
use serde::Serialize;
use tokio::sync::watch;

/// Published settings screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingsUiState {
    pub built_in_music_enabled: bool,
}

/// Settings screen view-state
pub struct SettingsViewState {
    settings: SettingsStore,
    state: watch::Sender<SettingsUiState>,
    tasks: TaskScope,
}

impl SettingsViewState {
    pub fn new(settings: SettingsStore) -> Self {
        let (state, _) = watch::channel(SettingsUiState {
            built_in_music_enabled: settings.built_in_music_enabled(),
        });

        let tasks = TaskScope::new();
        let mut enabled = settings.subscribe_built_in_music();
        let mirror = state.clone();
        tasks.spawn(async move {
            while enabled.changed().await.is_ok() {
                let built_in_music_enabled = *enabled.borrow_and_update();
                mirror.send_replace(SettingsUiState { built_in_music_enabled });
            }
        });

        Self { settings, state, tasks }
    }

    pub fn state(&self) -> SettingsUiState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SettingsUiState> {
        self.state.subscribe()
    }

    /// Persist the built-in music preference
    ///
    /// # Errors
    /// Returns an error if the settings file cannot be written; the
    /// published state is left unchanged in that case.
    pub fn set_built_in_music_enabled(&self, enabled: bool) -> Result<()> {
        self.settings.set_built_in_music_enabled(enabled)?;
        self.state.send_replace(SettingsUiState {
            built_in_music_enabled: enabled,
        });
        Ok(())
    }
}
