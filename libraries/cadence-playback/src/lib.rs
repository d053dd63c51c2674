//! Cadence - Playback Engine
//!
//! Platform-agnostic playback control for Cadence.
//!
//! This crate provides:
//! - A play queue with list order and shuffled play order
//! - Repeat modes (Off, All, One)
//! - A buffering watchdog: a load that stays buffering past the timeout
//!   (15 s by default) is failed and skipped
//! - Failure-and-advance on backend errors, recorded in [`FailedTracks`] and
//!   reported as [`EngineEvent`]s
//!
//! # Architecture
//!
//! The engine never produces audio. It drives a [`PlayerBackend`] and reacts
//! to the [`BackendEvent`]s the backend reports. [`ProbeBackend`] is the
//! bundled backend: it validates local files with symphonia and simulates
//! playback time.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_core::{Song, SongId};
//! use cadence_playback::{backend_channel, EngineConfig, PlaybackEngine, ProbeBackend};
//!
//! # async fn example() {
//! let (tx, rx) = backend_channel();
//! let engine = PlaybackEngine::new(ProbeBackend::new(tx), rx, EngineConfig::default());
//!
//! engine
//!     .set_queue(vec![Song::new(SongId::new(1), "Intro", "Band", 95_000, "file:///music/intro.flac")])
//!     .await;
//! engine.play().await;
//!
//! let mut failures = engine.events();
//! while let Ok(event) = failures.recv().await {
//!     println!("{event:?}");
//! }
//! # }
//! ```

pub mod backend;
pub mod engine;
pub mod error;
pub mod events;
pub mod failed;
pub mod probe;
pub mod queue;
pub mod shuffle;
pub mod types;

pub use backend::PlayerBackend;
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::{backend_channel, BackendEvent, BackendEventSender, EngineEvent, LoadGeneration};
pub use failed::FailedTracks;
pub use probe::ProbeBackend;
pub use queue::PlayQueue;
pub use types::{EngineConfig, EngineSnapshot, EngineState, RepeatMode};
