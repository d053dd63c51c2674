//! Cadence view-states
//!
//! One view-state per screen. Each publishes an immutable snapshot through a
//! `tokio::sync::watch` channel, accepts intents as method calls, and owns
//! the background tasks that keep its snapshot current. Dropping a
//! view-state stops its tasks.
//!
//! The active-playlist selection and the failed-track set are shared,
//! injected handles ([`PlaybackSelection`], [`FailedTracks`]). The failed-track
//! set is filled by the playback engine and read when assembling queues.

pub mod all_songs;
pub mod player;
pub mod playlists;
pub mod queue;
pub mod reorder;
pub mod selection;
pub mod settings;
pub mod tasks;

pub use all_songs::{AllSongsUiState, AllSongsViewState};
pub use player::{PlayerUiState, PlayerViewState};
pub use playlists::{PlaylistDialog, PlaylistsUiState, PlaylistsViewState};
pub use queue::QueueSource;
pub use cadence_playback::FailedTracks;
pub use selection::PlaybackSelection;
pub use settings::{SettingsUiState, SettingsViewState};
pub use tasks::TaskScope;
