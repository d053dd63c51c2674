//! Cadence Storage
//!
//! `SQLite` persistence for playlists, cached songs and playlist membership,
//! plus the small JSON settings file.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: `playlists`, `songs` and `memberships` each own
//!   their queries as free functions over a `SqlitePool`
//! - **Live reads**: [`LibraryStore`] wraps the slices, bumps a revision
//!   after every write and hands out [`LiveQuery`] views that re-run on change
//! - **Destructive migration**: a schema version mismatch drops and recreates
//!   every table; there is no data-preserving upgrade path
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_storage::LibraryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = LibraryStore::open("sqlite://cadence.db").await?;
//! let focus = store.create_playlist("Focus").await?;
//!
//! let mut playlists = store.watch_playlists();
//! let current = playlists.current().await?;
//! assert!(current.iter().any(|p| p.playlist.id == focus.id));
//! # Ok(())
//! # }
//! ```

mod error;
mod store;

// Vertical slices
pub mod memberships;
pub mod playlists;
pub mod songs;

// Key-value preferences
pub mod settings;

pub use error::StorageError;
pub use settings::SettingsStore;
pub use store::{LibraryStore, LiveQuery};

use sqlx::sqlite::SqlitePool;

/// Schema version stored in `PRAGMA user_version`
pub const SCHEMA_VERSION: i64 = 1;

const MIGRATIONS: &[&str] = &[
    include_str!("../migrations/0001_create_playlists.sql"),
    include_str!("../migrations/0002_create_songs.sql"),
    include_str!("../migrations/0003_create_playlist_songs.sql"),
];

// Reverse dependency order
const TABLES: &[&str] = &["playlist_songs", "songs", "playlists"];

/// Bring the schema to [`SCHEMA_VERSION`]
///
/// A database at any other non-zero version is wiped: all tables are dropped
/// and recreated. A fresh database (version 0) is simply created.
///
/// # Errors
///
/// Returns an error if any statement fails; the whole rebuild runs in one
/// transaction, so a failure leaves the previous schema in place.
pub async fn run_migrations(pool: &SqlitePool) -> error::Result<()> {
    let mut tx = pool.begin().await?;

    let current: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(&mut *tx)
        .await?;

    if current == SCHEMA_VERSION {
        tracing::debug!(version = current, "Schema up to date");
        return Ok(());
    }

    if current != 0 {
        tracing::warn!(
            from = current,
            to = SCHEMA_VERSION,
            "Schema version changed, dropping all stored playlists"
        );
        for table in TABLES {
            sqlx::raw_sql(&format!("DROP TABLE IF EXISTS {table}"))
                .execute(&mut *tx)
                .await
                .map_err(|e| error::StorageError::Migration(e.to_string()))?;
        }
    }

    for migration in MIGRATIONS {
        sqlx::raw_sql(migration)
            .execute(&mut *tx)
            .await
            .map_err(|e| error::StorageError::Migration(e.to_string()))?;
    }

    sqlx::raw_sql(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(version = SCHEMA_VERSION, "Schema created");
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://cadence.db`)
///
/// In-memory databases are limited to a single connection, since every
/// `SQLite` connection to `:memory:` opens its own empty database.
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = database_url, "Creating SQLite pool");

    let in_memory = database_url.contains(":memory:");
    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(std::time::Duration::from_secs(30));
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let mut pool_options = SqlitePoolOptions::new().max_connections(5);
    if in_memory {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    let pool = pool_options.connect_with(options).await?;

    tracing::debug!("SQLite pool ready");
    Ok(pool)
}
