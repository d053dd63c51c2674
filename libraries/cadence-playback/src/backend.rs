//! Player backend seam
//!
//! The engine never touches audio itself. A [`PlayerBackend`] loads and
//! plays one item at a time and reports what happens to it on the
//! [`BackendEventSender`](crate::events::BackendEventSender) it was built
//! with, tagging each report with the generation passed to `load`.

use crate::events::LoadGeneration;
use cadence_core::Song;
use std::time::Duration;

/// Platform player driven by the engine
///
/// Commands are synchronous and must not block; anything slow (probing,
/// network) happens on the backend's own tasks and is reported as events.
pub trait PlayerBackend: Send + 'static {
    /// Start loading `song`, replacing whatever was loaded
    ///
    /// The backend should report `Buffering`, then `Ready` or `Error`, and
    /// `Ended` when playback reaches the end, all tagged with `generation`.
    fn load(&mut self, song: &Song, generation: LoadGeneration);

    /// Start or resume playback once ready
    fn play(&mut self);

    /// Pause playback, keeping the position
    fn pause(&mut self);

    /// Jump back to the start of the loaded item
    fn seek_to_start(&mut self);

    /// Stop and unload
    fn stop(&mut self);

    /// Position within the loaded item
    fn position(&self) -> Duration;
}
