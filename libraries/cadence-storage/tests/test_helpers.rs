//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! so migrations, the WAL pool and multi-connection reads behave as in production.

#![allow(dead_code)]

use cadence_core::types::*;
use cadence_storage::LibraryStore;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", path.display());

        let pool = cadence_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        cadence_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Store facade over this database
    pub fn store(&self) -> LibraryStore {
        LibraryStore::new(self.pool.clone())
    }
}

/// Test fixture: a device-style song
pub fn test_song(id: i64, title: &str) -> Song {
    Song::new(
        SongId::new(id),
        title,
        "Test Artist",
        180_000,
        format!("file:///music/{}.mp3", title.replace(' ', "_")),
    )
}

/// Test fixture: create a playlist with the given songs
pub async fn create_test_playlist(pool: &SqlitePool, name: &str, songs: &[Song]) -> PlaylistId {
    let playlist = cadence_storage::playlists::create(pool, name)
        .await
        .expect("Failed to create test playlist");

    cadence_storage::memberships::add_songs(pool, playlist.id, songs)
        .await
        .expect("Failed to add songs to test playlist");

    playlist.id
}
