//! Cadence Core
//!
//! Platform-agnostic domain types, traits, and error handling for Cadence.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `Playlist`, `Membership`, `PlaylistWithSongs`
//! - **Core Traits**: `MediaIndex` (read-only scan of locally available audio)
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{Playlist, PlaylistId, Song, SongId};
//!
//! let song = Song::new(SongId::new(42), "Blue in Green", "Miles Davis", 337_000, "file:///music/blue.flac");
//! assert!(!song.is_builtin());
//!
//! let playlist = Playlist::new(PlaylistId::new(1), "Focus", 0);
//! assert_eq!(playlist.name, "Focus");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CadenceError, Result};
pub use traits::MediaIndex;
pub use types::{Membership, Playlist, PlaylistId, PlaylistWithSongs, Song, SongId};
