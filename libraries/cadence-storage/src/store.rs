//! Observable store facade
//!
//! [`LibraryStore`] owns the pool and a revision counter. Every successful
//! write bumps the revision; [`LiveQuery`] handles re-run their query when
//! they see a new revision, so readers always observe the latest state.

use crate::{create_pool, memberships, playlists, run_migrations, songs};
use cadence_core::{error::Result, types::*};
use sqlx::SqlitePool;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::watch;

type QueryFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;
type QueryFn<T> = Arc<dyn Fn(SqlitePool) -> QueryFuture<T> + Send + Sync>;

/// Playlist store with change notification
#[derive(Clone)]
pub struct LibraryStore {
    pool: SqlitePool,
    revision: Arc<watch::Sender<u64>>,
}

impl LibraryStore {
    /// Wrap an already-migrated pool
    pub fn new(pool: SqlitePool) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            pool,
            revision: Arc::new(revision),
        }
    }

    /// Open (or create) the database at `database_url` and bring the schema up to date
    pub async fn open(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    /// Underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Number of writes observed so far
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    // Writes

    /// Create a playlist at the end of the manual ordering
    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let playlist = playlists::create(&self.pool, name).await?;
        tracing::debug!(id = %playlist.id, name, "Created playlist");
        self.bump();
        Ok(playlist)
    }

    /// Rename a playlist
    pub async fn rename_playlist(&self, id: PlaylistId, name: &str) -> Result<()> {
        playlists::rename(&self.pool, id, name).await?;
        self.bump();
        Ok(())
    }

    /// Rewrite playlist display orders
    pub async fn update_playlist_orders(&self, orders: &[(PlaylistId, i64)]) -> Result<()> {
        playlists::update_orders(&self.pool, orders).await?;
        self.bump();
        Ok(())
    }

    /// Delete playlists and their memberships
    pub async fn delete_playlists(&self, ids: &[PlaylistId]) -> Result<()> {
        playlists::delete_many(&self.pool, ids).await?;
        tracing::debug!(count = ids.len(), "Deleted playlists");
        self.bump();
        Ok(())
    }

    /// Insert or replace a song
    pub async fn upsert_song(&self, song: &Song) -> Result<()> {
        songs::upsert(&self.pool, song).await?;
        self.bump();
        Ok(())
    }

    /// Upsert songs and add them to a playlist with `display_order = index`
    pub async fn add_songs_to_playlist(&self, playlist_id: PlaylistId, songs: &[Song]) -> Result<usize> {
        let added = memberships::add_songs(&self.pool, playlist_id, songs).await?;
        tracing::debug!(playlist = %playlist_id, requested = songs.len(), added, "Added songs to playlist");
        self.bump();
        Ok(added)
    }

    /// Remove a song from a playlist
    pub async fn remove_song_from_playlist(&self, playlist_id: PlaylistId, song_id: SongId) -> Result<()> {
        memberships::remove(&self.pool, playlist_id, song_id).await?;
        self.bump();
        Ok(())
    }

    /// Rewrite membership orders
    pub async fn update_membership_orders(&self, orders: &[Membership]) -> Result<()> {
        memberships::update_orders(&self.pool, orders).await?;
        self.bump();
        Ok(())
    }

    // One-shot reads

    /// All playlists with their songs
    pub async fn playlists_with_songs(&self) -> Result<Vec<PlaylistWithSongs>> {
        playlists::get_all_with_songs(&self.pool).await
    }

    /// One playlist with its songs
    pub async fn playlist_with_songs(&self, id: PlaylistId) -> Result<Option<PlaylistWithSongs>> {
        playlists::get_with_songs(&self.pool, id).await
    }

    /// Playlists matching `ids`
    pub async fn playlists_by_ids(&self, ids: &[PlaylistId]) -> Result<Vec<Playlist>> {
        playlists::get_by_ids(&self.pool, ids).await
    }

    /// A single membership
    pub async fn membership(&self, playlist_id: PlaylistId, song_id: SongId) -> Result<Option<Membership>> {
        memberships::get(&self.pool, playlist_id, song_id).await
    }

    /// Every membership
    pub async fn memberships(&self) -> Result<Vec<Membership>> {
        memberships::get_all(&self.pool).await
    }

    // Live reads

    /// Live view of every playlist with its songs
    pub fn watch_playlists(&self) -> LiveQuery<Vec<PlaylistWithSongs>> {
        self.live(|pool| Box::pin(async move { playlists::get_all_with_songs(&pool).await }))
    }

    /// Live view of one playlist with its songs
    pub fn watch_playlist(&self, id: PlaylistId) -> LiveQuery<Option<PlaylistWithSongs>> {
        self.live(move |pool| Box::pin(async move { playlists::get_with_songs(&pool, id).await }))
    }

    fn live<T, F>(&self, query: F) -> LiveQuery<T>
    where
        F: Fn(SqlitePool) -> QueryFuture<T> + Send + Sync + 'static,
    {
        LiveQuery {
            pool: self.pool.clone(),
            revision: self.revision.subscribe(),
            query: Arc::new(query),
        }
    }
}

/// A read that re-runs whenever the store is written
///
/// The first call to [`LiveQuery::changed`] after creation resolves only
/// after a write; call [`LiveQuery::current`] for the initial value.
pub struct LiveQuery<T> {
    pool: SqlitePool,
    revision: watch::Receiver<u64>,
    query: QueryFn<T>,
}

impl<T> Clone for LiveQuery<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            revision: self.revision.clone(),
            query: Arc::clone(&self.query),
        }
    }
}

impl<T> LiveQuery<T> {
    /// Run the query against the latest state
    pub async fn current(&mut self) -> Result<T> {
        let _ = self.revision.borrow_and_update();
        (self.query)(self.pool.clone()).await
    }

    /// Wait for the next write, then run the query
    ///
    /// Several writes in quick succession may be observed as one. Returns
    /// `None` once every store handle has been dropped.
    pub async fn changed(&mut self) -> Option<Result<T>> {
        self.revision.changed().await.ok()?;
        Some(self.current().await)
    }
}
