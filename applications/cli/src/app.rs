/// Wiring shared by every screen
use crate::config::CadenceConfig;
use anyhow::Context;
use cadence_library::{AuditLog, DirectoryMediaIndex, MusicRepository};
use cadence_playback::{backend_channel, PlaybackEngine, ProbeBackend};
use cadence_state::{FailedTracks, PlaybackSelection, QueueSource};
use cadence_storage::{LibraryStore, SettingsStore};
use std::path::Path;
use std::sync::Arc;

/// Opened stores plus the process-lifetime playback state
pub struct App {
    pub config: CadenceConfig,
    pub repository: MusicRepository,
    pub settings: SettingsStore,
    pub selection: PlaybackSelection,
    pub failed: FailedTracks,
}

impl App {
    /// Open the database, settings and audit log named in `config`
    pub async fn open(config: CadenceConfig) -> anyhow::Result<Self> {
        if let Some(db_path) = config.database_path() {
            ensure_parent(&db_path)?;
        }
        ensure_parent(&config.settings_path)?;
        ensure_parent(&config.audit_log_path)?;

        let store = LibraryStore::open(&config.database_url)
            .await
            .with_context(|| format!("Failed to open database {}", config.database_url))?;
        tracing::info!("Database connected");

        let settings = SettingsStore::open(&config.settings_path)
            .with_context(|| format!("Failed to read settings {}", config.settings_path.display()))?;

        let index = DirectoryMediaIndex::new(config.scan_config());
        if config.music_dirs.is_empty() {
            tracing::warn!("No music directories configured; device library is empty");
        }

        let repository = MusicRepository::new(store, Arc::new(index), AuditLog::new(&config.audit_log_path));

        Ok(Self {
            config,
            repository,
            settings,
            selection: PlaybackSelection::new(),
            failed: FailedTracks::new(),
        })
    }

    pub fn queue_source(&self) -> QueueSource {
        QueueSource::new(
            self.repository.clone(),
            self.settings.clone(),
            self.selection.clone(),
            self.failed.clone(),
        )
    }

    /// Start a playback engine over the probing backend
    ///
    /// Failures land in the app's failed set, which every queue built by
    /// [`App::queue_source`] excludes.
    pub fn start_engine(&self) -> PlaybackEngine {
        let (tx, rx) = backend_channel();
        PlaybackEngine::with_failed_tracks(
            ProbeBackend::new(tx),
            rx,
            self.config.engine_config(),
            self.failed.clone(),
        )
    }
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}
