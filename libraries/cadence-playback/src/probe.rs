//! Probe-only backend
//!
//! [`ProbeBackend`] has no audio output. It checks that local files open and
//! have a decodable track (symphonia), then runs a wall clock for the song's
//! duration. Remote locators are never fetched: they stay in buffering, so
//! the engine's watchdog decides their fate.

use crate::backend::PlayerBackend;
use crate::error::{PlaybackError, Result};
use crate::events::{BackendEvent, BackendEventSender, LoadGeneration};
use cadence_core::Song;
use std::path::Path;
use std::time::Duration;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Check that a file has a track symphonia can decode
pub fn probe_file(path: &Path) -> Result<()> {
    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| PlaybackError::Unplayable(format!("Failed to probe file: {}", e)))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| PlaybackError::Unplayable("No audio tracks found".to_string()))?;

    symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| PlaybackError::Unplayable(format!("Failed to create decoder: {}", e)))?;

    Ok(())
}

/// Wall-clock playback position
#[derive(Debug, Default)]
struct PlayClock {
    accumulated: Duration,
    started_at: Option<Instant>,
}

impl PlayClock {
    fn position(&self) -> Duration {
        self.accumulated + self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }

    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += started.elapsed();
        }
    }

    fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }
}

struct Loaded {
    duration: Duration,
    generation: LoadGeneration,
    playable: bool,
}

/// Backend that validates media without producing sound
pub struct ProbeBackend {
    events: BackendEventSender,
    loaded: Option<Loaded>,
    clock: PlayClock,
    end_timer: Option<JoinHandle<()>>,
}

impl ProbeBackend {
    /// Create a backend reporting on `events`
    pub fn new(events: BackendEventSender) -> Self {
        Self {
            events,
            loaded: None,
            clock: PlayClock::default(),
            end_timer: None,
        }
    }

    fn send(&self, generation: LoadGeneration, event: BackendEvent) {
        let _ = self.events.send((generation, event));
    }

    fn cancel_end_timer(&mut self) {
        if let Some(handle) = self.end_timer.take() {
            handle.abort();
        }
    }

    /// Schedule `Ended` for the remaining duration of a running clock
    fn schedule_end(&mut self) {
        self.cancel_end_timer();
        let Some(loaded) = &self.loaded else {
            return;
        };
        if self.clock.started_at.is_none() {
            return;
        }

        let remaining = loaded.duration.saturating_sub(self.clock.position());
        let generation = loaded.generation;
        let events = self.events.clone();
        self.end_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            let _ = events.send((generation, BackendEvent::Ended));
        }));
    }
}

impl PlayerBackend for ProbeBackend {
    fn load(&mut self, song: &Song, generation: LoadGeneration) {
        self.cancel_end_timer();
        self.clock = PlayClock::default();
        self.send(generation, BackendEvent::Buffering);

        let playable = if let Some(path) = song.local_path() {
            let events = self.events.clone();
            tokio::task::spawn_blocking(move || {
                let event = match probe_file(&path) {
                    Ok(()) => BackendEvent::Ready,
                    Err(e) => BackendEvent::Error(e.to_string()),
                };
                let _ = events.send((generation, event));
            });
            true
        } else if song.is_remote() {
            tracing::debug!(uri = %song.uri, "Remote media is not fetched, staying in buffering");
            false
        } else {
            self.send(generation, BackendEvent::Error(format!("Unsupported locator: {}", song.uri)));
            false
        };

        self.loaded = Some(Loaded {
            duration: song.duration(),
            generation,
            playable,
        });
    }

    fn play(&mut self) {
        if !self.loaded.as_ref().is_some_and(|l| l.playable) {
            return;
        }
        self.clock.start();
        self.schedule_end();
    }

    fn pause(&mut self) {
        self.cancel_end_timer();
        self.clock.pause();
    }

    fn seek_to_start(&mut self) {
        self.clock.reset();
        self.schedule_end();
    }

    fn stop(&mut self) {
        self.cancel_end_timer();
        self.clock = PlayClock::default();
        self.loaded = None;
    }

    fn position(&self) -> Duration {
        self.clock.position()
    }
}

impl Drop for ProbeBackend {
    fn drop(&mut self) {
        self.cancel_end_timer();
    }
}
