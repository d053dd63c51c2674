use cadence_core::{error::Result, types::*, CadenceError};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

fn playlist_from_row(row: &SqliteRow) -> Playlist {
    Playlist::new(
        PlaylistId::new(row.get("id")),
        row.get::<String, _>("name"),
        row.get("display_order"),
    )
}

/// Create a playlist at the end of the manual ordering
pub async fn create(pool: &SqlitePool, name: &str) -> Result<Playlist> {
    let result = sqlx::query(
        r#"
        INSERT INTO playlists (name, display_order)
        VALUES (?, (SELECT COALESCE(MAX(display_order) + 1, 0) FROM playlists))
        "#,
    )
    .bind(name)
    .execute(pool)
    .await?;

    let id = PlaylistId::new(result.last_insert_rowid());

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| CadenceError::storage("Failed to retrieve created playlist"))
}

/// Get a playlist row by id
pub async fn get_by_id(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query("SELECT id, name, display_order FROM playlists WHERE id = ?")
        .bind(id.get())
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(playlist_from_row))
}

/// Get every playlist, ascending by display order (ties by id)
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        "SELECT id, name, display_order FROM playlists ORDER BY display_order ASC, id ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(playlist_from_row).collect())
}

/// Get the playlists matching `ids`, ascending by display order
///
/// Unknown ids are ignored.
pub async fn get_by_ids(pool: &SqlitePool, ids: &[PlaylistId]) -> Result<Vec<Playlist>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = sqlx::QueryBuilder::new("SELECT id, name, display_order FROM playlists WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.get());
    }
    separated.push_unseparated(") ORDER BY display_order ASC, id ASC");

    let rows = builder.build().fetch_all(pool).await?;
    Ok(rows.iter().map(playlist_from_row).collect())
}

/// Rename a playlist
pub async fn rename(pool: &SqlitePool, id: PlaylistId, name: &str) -> Result<()> {
    let result = sqlx::query("UPDATE playlists SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id.get())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CadenceError::PlaylistNotFound(id));
    }

    Ok(())
}

/// Rewrite playlist display orders in one transaction
pub async fn update_orders(pool: &SqlitePool, orders: &[(PlaylistId, i64)]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for (id, display_order) in orders {
        sqlx::query("UPDATE playlists SET display_order = ? WHERE id = ?")
            .bind(display_order)
            .bind(id.get())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Delete a playlist and its memberships
pub async fn delete(pool: &SqlitePool, id: PlaylistId) -> Result<()> {
    delete_many(pool, &[id]).await
}

/// Delete playlists and their memberships in one transaction
///
/// Memberships go first. Unknown ids are ignored. Cached songs are kept even
/// when no playlist references them anymore.
pub async fn delete_many(pool: &SqlitePool, ids: &[PlaylistId]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for id in ids {
        sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Get every playlist with its songs
///
/// Playlists are ordered by display order; each playlist's songs keep
/// store-native insertion order.
pub async fn get_all_with_songs(pool: &SqlitePool) -> Result<Vec<PlaylistWithSongs>> {
    let playlists = get_all(pool).await?;

    let rows = sqlx::query(
        r#"
        SELECT
            ps.playlist_id, ps.song_id, ps.display_order,
            s.title, s.artist, s.album, s.duration_ms, s.uri
        FROM playlist_songs ps
        INNER JOIN songs s ON ps.song_id = s.id
        ORDER BY ps.rowid
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut members: HashMap<PlaylistId, Vec<(Song, Membership)>> = HashMap::new();
    for row in &rows {
        let playlist_id = PlaylistId::new(row.get("playlist_id"));
        let song = crate::songs::song_from_row(row, "song_id");
        let membership = Membership::new(playlist_id, song.id, row.get("display_order"));
        members.entry(playlist_id).or_default().push((song, membership));
    }

    Ok(playlists
        .into_iter()
        .map(|playlist| {
            let (songs, memberships) = members.remove(&playlist.id).unwrap_or_default().into_iter().unzip();
            PlaylistWithSongs {
                playlist,
                songs,
                memberships,
            }
        })
        .collect())
}

/// Get one playlist with its songs in store-native order
pub async fn get_with_songs(pool: &SqlitePool, id: PlaylistId) -> Result<Option<PlaylistWithSongs>> {
    let Some(playlist) = get_by_id(pool, id).await? else {
        return Ok(None);
    };

    let rows = sqlx::query(
        r#"
        SELECT
            ps.song_id, ps.display_order,
            s.title, s.artist, s.album, s.duration_ms, s.uri
        FROM playlist_songs ps
        INNER JOIN songs s ON ps.song_id = s.id
        WHERE ps.playlist_id = ?
        ORDER BY ps.rowid
        "#,
    )
    .bind(id.get())
    .fetch_all(pool)
    .await?;

    let (songs, memberships) = rows
        .iter()
        .map(|row| {
            let song = crate::songs::song_from_row(row, "song_id");
            let membership = Membership::new(id, song.id, row.get("display_order"));
            (song, membership)
        })
        .unzip();

    Ok(Some(PlaylistWithSongs {
        playlist,
        songs,
        memberships,
    }))
}
