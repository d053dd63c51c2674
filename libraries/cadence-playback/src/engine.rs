//! Playback engine
//!
//! Wraps a [`PlayerBackend`] with the queue, shuffle and repeat, and one
//! recovery policy: a track that errors, or stays buffering longer than the
//! configured timeout, is recorded in the [`FailedTracks`] set, dropped from
//! the queue, and the engine moves on to the next item (or stops when nothing
//! is left).
//!
//! State is shared behind a `tokio::sync::Mutex`. Observers read snapshots
//! from a `watch` channel and failure events from a `broadcast` channel.

use crate::backend::PlayerBackend;
use crate::events::{BackendEvent, BackendEventReceiver, EngineEvent, LoadGeneration};
use crate::failed::FailedTracks;
use crate::queue::PlayQueue;
use crate::types::{EngineConfig, EngineSnapshot, EngineState, RepeatMode};
use cadence_core::Song;
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;

const EVENT_CAPACITY: usize = 64;

/// Handle to a running playback engine
///
/// Cheap to clone. The engine shuts down (backend dropped, timers cancelled)
/// when the last handle is dropped.
#[derive(Clone)]
pub struct PlaybackEngine {
    shared: Arc<Shared>,
}

struct Shared {
    core: Mutex<EngineCore>,
    snapshot: watch::Sender<EngineSnapshot>,
    events: broadcast::Sender<EngineEvent>,
    failed: FailedTracks,
}

impl Shared {
    fn publish(&self, core: &EngineCore) {
        self.snapshot.send_replace(core.snapshot());
    }
}

struct EngineCore {
    backend: Box<dyn PlayerBackend>,
    queue: PlayQueue,
    state: EngineState,
    play_when_ready: bool,
    repeat: RepeatMode,
    generation: LoadGeneration,
    watchdog: Option<JoinHandle<()>>,
    config: EngineConfig,
    failed: FailedTracks,
    events: broadcast::Sender<EngineEvent>,
    shared: Weak<Shared>,
}

impl PlaybackEngine {
    /// Start an engine over `backend`
    ///
    /// `backend_events` must be the receiving end of the channel the backend
    /// reports on. Must be called inside a tokio runtime.
    pub fn new<B: PlayerBackend>(backend: B, backend_events: BackendEventReceiver, config: EngineConfig) -> Self {
        Self::with_failed_tracks(backend, backend_events, config, FailedTracks::new())
    }

    /// Start an engine that records failures into an existing set
    pub fn with_failed_tracks<B: PlayerBackend>(
        backend: B,
        backend_events: BackendEventReceiver,
        config: EngineConfig,
        failed: FailedTracks,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let shared = Arc::new_cyclic(|weak: &Weak<Shared>| {
            let mut queue = PlayQueue::new();
            queue.set_shuffled(config.shuffle);
            let core = EngineCore {
                backend: Box::new(backend),
                queue,
                state: EngineState::Idle,
                play_when_ready: false,
                repeat: config.repeat,
                generation: 0,
                watchdog: None,
                config,
                failed: failed.clone(),
                events: events.clone(),
                shared: weak.clone(),
            };
            let (snapshot, _) = watch::channel(core.snapshot());
            Shared {
                core: Mutex::new(core),
                snapshot,
                events,
                failed,
            }
        });

        tokio::spawn(run_backend_events(Arc::downgrade(&shared), backend_events));

        tracing::debug!("Playback engine started");
        Self { shared }
    }

    /// Latest snapshot
    pub fn snapshot(&self) -> EngineSnapshot {
        self.shared.snapshot.borrow().clone()
    }

    /// Observe snapshots
    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.shared.snapshot.subscribe()
    }

    /// Observe failure and exhaustion events
    ///
    /// Slow receivers may lag; [`failed_tracks`](Self::failed_tracks) is the
    /// complete record.
    pub fn events(&self) -> broadcast::Receiver<EngineEvent> {
        self.shared.events.subscribe()
    }

    /// Every song that failed on this engine (or on any engine sharing the set)
    pub fn failed_tracks(&self) -> FailedTracks {
        self.shared.failed.clone()
    }

    async fn with_core<R>(&self, f: impl FnOnce(&mut EngineCore) -> R) -> R {
        let mut core = self.shared.core.lock().await;
        let result = f(&mut core);
        self.shared.publish(&core);
        result
    }

    /// Replace the queue
    ///
    /// If the current song is still in `songs` it keeps playing undisturbed.
    /// Otherwise the first song is loaded, and starts if the engine was
    /// playing or about to. An empty list stops the engine.
    pub async fn set_queue(&self, songs: Vec<Song>) {
        self.with_core(|core| core.set_queue(songs)).await;
    }

    /// Start or resume playback
    pub async fn play(&self) {
        self.with_core(EngineCore::play).await;
    }

    /// Pause playback
    pub async fn pause(&self) {
        self.with_core(EngineCore::pause).await;
    }

    /// Pause if playing, play otherwise
    pub async fn toggle_play_pause(&self) {
        self.with_core(|core| {
            if core.play_when_ready {
                core.pause();
            } else {
                core.play();
            }
        })
        .await;
    }

    /// Skip to the next song; returns `false` if there is none
    pub async fn skip_next(&self) -> bool {
        self.with_core(EngineCore::skip_next).await
    }

    /// Restart the song if past the restart threshold, else go to the previous song
    pub async fn skip_previous(&self) {
        self.with_core(EngineCore::skip_previous).await;
    }

    /// Stop and unload, keeping the queue
    pub async fn stop(&self) {
        self.with_core(EngineCore::stop).await;
    }

    /// Flip shuffle; returns the new state
    pub async fn toggle_shuffle(&self) -> bool {
        self.with_core(|core| {
            let shuffled = !core.queue.is_shuffled();
            core.queue.set_shuffled(shuffled);
            shuffled
        })
        .await
    }

    /// Advance the repeat mode Off → All → One → Off; returns the new mode
    pub async fn cycle_repeat(&self) -> RepeatMode {
        self.with_core(|core| {
            core.repeat = core.repeat.cycle();
            core.repeat
        })
        .await
    }

    /// Re-read the backend position into the published snapshot
    pub async fn refresh_position(&self) -> EngineSnapshot {
        let core = self.shared.core.lock().await;
        self.shared.publish(&core);
        core.snapshot()
    }
}

async fn run_backend_events(shared: Weak<Shared>, mut events: BackendEventReceiver) {
    while let Some((generation, event)) = events.recv().await {
        let Some(shared) = shared.upgrade() else {
            break;
        };
        let mut core = shared.core.lock().await;
        if generation != core.generation {
            tracing::trace!(generation, current = core.generation, ?event, "Ignoring stale backend event");
            continue;
        }
        core.on_backend_event(event);
        shared.publish(&core);
    }
    tracing::debug!("Backend event loop finished");
}

impl EngineCore {
    fn snapshot(&self) -> EngineSnapshot {
        let current = self.queue.current().cloned();
        let loaded = !matches!(self.state, EngineState::Idle | EngineState::Error);
        EngineSnapshot {
            state: self.state,
            is_playing: self.state == EngineState::Playing,
            duration_ms: current.as_ref().map(|s| s.duration_ms).unwrap_or(0),
            position_ms: if loaded {
                self.backend.position().as_millis() as u64
            } else {
                0
            },
            current,
            shuffle: self.queue.is_shuffled(),
            repeat: self.repeat,
            queue_len: self.queue.len(),
        }
    }

    fn set_queue(&mut self, songs: Vec<Song>) {
        let kept = self.queue.replace(songs);
        tracing::debug!(len = self.queue.len(), kept_current = kept, "Queue replaced");

        if self.queue.is_empty() {
            self.stop();
            return;
        }
        if kept && self.state != EngineState::Idle {
            return;
        }

        self.load_current();
    }

    fn play(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        self.play_when_ready = true;

        match self.state {
            EngineState::Idle | EngineState::Error => self.load_current(),
            EngineState::Ended => {
                self.backend.seek_to_start();
                self.backend.play();
                self.state = EngineState::Playing;
            }
            EngineState::Ready | EngineState::Paused => {
                self.backend.play();
                self.state = EngineState::Playing;
            }
            EngineState::Buffering => self.backend.play(),
            EngineState::Playing => {}
        }
    }

    fn pause(&mut self) {
        self.play_when_ready = false;
        self.backend.pause();
        if self.state == EngineState::Playing {
            self.state = EngineState::Paused;
        }
    }

    fn stop(&mut self) {
        self.cancel_watchdog();
        self.generation += 1;
        self.backend.stop();
        self.play_when_ready = false;
        self.state = EngineState::Idle;
    }

    fn skip_next(&mut self) -> bool {
        let wrap = self.repeat == RepeatMode::All;
        if self.queue.advance(wrap).is_none() {
            return false;
        }
        self.load_current();
        true
    }

    fn skip_previous(&mut self) {
        if self.state != EngineState::Idle && self.backend.position() > self.config.restart_threshold {
            self.backend.seek_to_start();
            return;
        }

        let wrap = self.repeat == RepeatMode::All;
        if self.queue.retreat(wrap).is_some() {
            self.load_current();
        } else {
            self.backend.seek_to_start();
        }
    }

    /// Load the song under the cursor and arm the watchdog
    fn load_current(&mut self) {
        let Some(song) = self.queue.current().cloned() else {
            self.stop();
            return;
        };

        self.generation += 1;
        self.state = EngineState::Buffering;
        tracing::debug!(song = %song.id, title = %song.title, generation = self.generation, "Loading");

        self.backend.load(&song, self.generation);
        if self.play_when_ready {
            self.backend.play();
        }
        self.arm_watchdog();
    }

    fn on_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Buffering => {
                if self.state != EngineState::Buffering {
                    self.state = EngineState::Buffering;
                    self.arm_watchdog();
                }
            }
            BackendEvent::Ready => {
                self.cancel_watchdog();
                self.state = if self.play_when_ready {
                    EngineState::Playing
                } else {
                    EngineState::Ready
                };
            }
            BackendEvent::Ended => {
                self.cancel_watchdog();
                self.on_track_ended();
            }
            BackendEvent::Error(reason) => self.fail_current(reason),
        }
    }

    fn on_track_ended(&mut self) {
        match self.repeat {
            RepeatMode::One => {
                self.backend.seek_to_start();
                self.backend.play();
                self.state = EngineState::Playing;
            }
            repeat => {
                if self.queue.advance(repeat == RepeatMode::All).is_some() {
                    self.load_current();
                } else {
                    self.play_when_ready = false;
                    self.state = EngineState::Ended;
                    tracing::info!("Reached the end of the queue");
                    let _ = self.events.send(EngineEvent::QueueExhausted);
                }
            }
        }
    }

    /// Report the current song as failed, drop it, and move on
    fn fail_current(&mut self, reason: String) {
        self.cancel_watchdog();
        let Some(failed) = self.queue.current().map(|s| s.id) else {
            return;
        };

        tracing::warn!(song = %failed, %reason, "Track failed, skipping");
        self.failed.insert(failed);
        let _ = self.events.send(EngineEvent::TrackFailed {
            song_id: failed,
            reason,
        });

        let wrap = self.repeat == RepeatMode::All;
        if self.queue.remove_current(wrap).is_some() {
            self.load_current();
        } else {
            self.stop();
            self.state = EngineState::Error;
            tracing::info!("No playable track left in the queue");
            let _ = self.events.send(EngineEvent::QueueExhausted);
        }
    }

    fn arm_watchdog(&mut self) {
        self.cancel_watchdog();

        let generation = self.generation;
        let timeout = self.config.buffering_timeout;
        let deadline = tokio::time::Instant::now() + timeout;
        let shared = self.shared.clone();

        self.watchdog = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let mut core = shared.core.lock().await;
            if core.generation == generation && core.state == EngineState::Buffering {
                // Detach our own handle so fail_current does not abort this task
                core.watchdog = None;
                core.fail_current(format!("still buffering after {}s", timeout.as_secs()));
                shared.publish(&core);
            }
        }));
    }

    fn cancel_watchdog(&mut self) {
        if let Some(handle) = self.watchdog.take() {
            handle.abort();
        }
    }
}

impl Drop for EngineCore {
    fn drop(&mut self) {
        self.cancel_watchdog();
    }
}
