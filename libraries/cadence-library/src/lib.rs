//! Cadence Library
//!
//! Everything that sits between the playlist store and the screens:
//!
//! - **Scanner**: [`DirectoryMediaIndex`] walks music directories and reads
//!   tags with lofty
//! - **Built-ins**: three remote fallback tracks with reserved negative ids
//! - **Audit**: append-only log of deleted playlists
//! - **Repository**: [`MusicRepository`], the facade the view-states talk to
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_library::{AuditLog, DirectoryMediaIndex, MusicRepository, ScanConfig};
//! use cadence_storage::LibraryStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = LibraryStore::open("sqlite://cadence.db").await?;
//! let index = DirectoryMediaIndex::new(ScanConfig::with_directories(["/home/me/Music"]));
//! let repo = MusicRepository::new(store, Arc::new(index), AuditLog::new("deleted_playlists_log.txt"));
//!
//! let songs = repo.local_songs().await?;
//! println!("{} songs on this device", songs.len());
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod builtin;
mod error;
pub mod repository;
pub mod scanner;

pub use audit::AuditLog;
pub use builtin::builtin_songs;
pub use error::LibraryError;
pub use repository::MusicRepository;
pub use scanner::{DirectoryMediaIndex, ScanConfig};
