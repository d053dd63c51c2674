//! Player screen state
//!
//! Owns the link between the playback engine and everything the queue is
//! derived from. The queue is rebuilt when the active playlist changes, when
//! built-in music is toggled, and after failed tracks. The engine records
//! failures in the shared failed set itself. While something is playing the
//! position is re-read once a second.

use crate::queue::QueueSource;
use crate::tasks::TaskScope;
use cadence_core::{PlaylistId, Result, Song};
use cadence_playback::{EngineEvent, EngineSnapshot, PlaybackEngine, RepeatMode};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;

/// How often the position is refreshed while playing
pub const POSITION_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Published player screen state
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PlayerUiState {
    pub is_playing: bool,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub current: Option<Song>,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub queue_len: usize,
}

impl From<&EngineSnapshot> for PlayerUiState {
    fn from(snapshot: &EngineSnapshot) -> Self {
        Self {
            is_playing: snapshot.is_playing,
            position_ms: snapshot.position_ms,
            duration_ms: snapshot.duration_ms,
            current: snapshot.current.clone(),
            shuffle: snapshot.shuffle,
            repeat: snapshot.repeat,
            queue_len: snapshot.queue_len,
        }
    }
}

/// Player screen view-state
pub struct PlayerViewState {
    engine: PlaybackEngine,
    source: QueueSource,
    state: watch::Sender<PlayerUiState>,
    tasks: TaskScope,
}

impl PlayerViewState {
    /// Load the first queue and start the background tasks
    ///
    /// `engine` should record failures into `source.failed()`; see
    /// [`PlaybackEngine::with_failed_tracks`].
    ///
    /// # Errors
    /// Returns an error if the first queue cannot be assembled.
    pub async fn new(engine: PlaybackEngine, source: QueueSource) -> Result<Self> {
        if !engine.failed_tracks().shares_with(source.failed()) {
            tracing::warn!("Playback engine and queue source use different failed-track sets");
        }
        let (state, _) = watch::channel(PlayerUiState::from(&engine.snapshot()));
        let view = Self {
            engine,
            source,
            state,
            tasks: TaskScope::new(),
        };

        // Subscribe before the first load so no change is missed
        let events = view.engine.events();
        let selection = view.source.selection().subscribe();
        let built_in = view.source.settings().subscribe_built_in_music();

        reload(&view.engine, &view.source).await?;

        view.tasks.spawn(follow_inputs(
            view.engine.clone(),
            view.source.clone(),
            events,
            selection,
            built_in,
        ));
        view.tasks
            .spawn(mirror_snapshots(view.engine.subscribe(), view.state.clone()));
        view.tasks.spawn(poll_position(view.engine.clone()));

        Ok(view)
    }

    /// Latest state
    pub fn state(&self) -> PlayerUiState {
        self.state.borrow().clone()
    }

    /// Observe the state
    pub fn subscribe(&self) -> watch::Receiver<PlayerUiState> {
        self.state.subscribe()
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    pub async fn play_pause(&self) {
        self.engine.toggle_play_pause().await;
        self.publish_now();
    }

    /// Returns `false` if there was nothing to skip to
    pub async fn skip_next(&self) -> bool {
        let skipped = self.engine.skip_next().await;
        self.publish_now();
        skipped
    }

    pub async fn skip_previous(&self) {
        self.engine.skip_previous().await;
        self.publish_now();
    }

    pub async fn toggle_shuffle(&self) -> bool {
        let shuffle = self.engine.toggle_shuffle().await;
        self.publish_now();
        shuffle
    }

    pub async fn cycle_repeat(&self) -> RepeatMode {
        let repeat = self.engine.cycle_repeat().await;
        self.publish_now();
        repeat
    }

    /// Rebuild the queue from the current inputs
    pub async fn reload_queue(&self) -> Result<()> {
        reload(&self.engine, &self.source).await?;
        self.publish_now();
        Ok(())
    }

    fn publish_now(&self) {
        self.state.send_replace(PlayerUiState::from(&self.engine.snapshot()));
    }
}

async fn reload(engine: &PlaybackEngine, source: &QueueSource) -> Result<()> {
    let songs = source.assemble().await?;
    tracing::debug!(len = songs.len(), "Reloading play queue");
    engine.set_queue(songs).await;
    Ok(())
}

async fn follow_inputs(
    engine: PlaybackEngine,
    source: QueueSource,
    mut events: broadcast::Receiver<EngineEvent>,
    mut selection: watch::Receiver<Option<PlaylistId>>,
    mut built_in: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            changed = selection.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            changed = built_in.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            event = events.recv() => match event {
                Ok(EngineEvent::TrackFailed { song_id, reason }) => {
                    tracing::info!(song = %song_id, %reason, "Excluding failed track");
                }
                Ok(EngineEvent::QueueExhausted) => continue,
                // The failed set is complete regardless; rebuild from it
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::debug!(missed, "Playback events lagged, reloading queue");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }

        if let Err(e) = reload(&engine, &source).await {
            tracing::error!(error = %e, "Failed to reload play queue");
        }
    }
}

async fn mirror_snapshots(mut snapshots: watch::Receiver<EngineSnapshot>, state: watch::Sender<PlayerUiState>) {
    loop {
        let next = PlayerUiState::from(&*snapshots.borrow_and_update());
        state.send_if_modified(|current| {
            let changed = *current != next;
            *current = next;
            changed
        });
        if snapshots.changed().await.is_err() {
            break;
        }
    }
}

async fn poll_position(engine: PlaybackEngine) {
    let mut ticks = tokio::time::interval(POSITION_POLL_INTERVAL);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticks.tick().await;
        if engine.snapshot().is_playing {
            engine.refresh_position().await;
        }
    }
}
