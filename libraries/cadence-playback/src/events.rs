//! Playback events
//!
//! Two directions:
//! - [`BackendEvent`]: player backend → engine (lifecycle of the loaded item)
//! - [`EngineEvent`]: engine → observers (failures worth reacting to)

use cadence_core::SongId;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Identifies one `load` call; events from older loads are ignored
pub type LoadGeneration = u64;

/// Channel the backend reports on
pub type BackendEventSender = mpsc::UnboundedSender<(LoadGeneration, BackendEvent)>;

/// Receiving end handed to the engine
pub type BackendEventReceiver = mpsc::UnboundedReceiver<(LoadGeneration, BackendEvent)>;

/// Create a backend event channel
pub fn backend_channel() -> (BackendEventSender, BackendEventReceiver) {
    mpsc::unbounded_channel()
}

/// Lifecycle reports from the player backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendEvent {
    /// Media is loading or re-buffering
    Buffering,

    /// Media is ready to play
    Ready,

    /// Playback reached the end of the item
    Ended,

    /// The item cannot be played
    Error(String),
}

/// Events emitted by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A track could not be played and was skipped
    TrackFailed {
        /// The failed song
        song_id: SongId,
        /// Why it failed (backend error or buffering timeout)
        reason: String,
    },

    /// Nothing left to play after a failure or the end of the queue
    QueueExhausted,
}
