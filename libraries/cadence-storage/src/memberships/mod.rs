use cadence_core::{error::Result, types::*};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

fn membership_from_row(row: &SqliteRow) -> Membership {
    Membership::new(
        PlaylistId::new(row.get("playlist_id")),
        SongId::new(row.get("song_id")),
        row.get("display_order"),
    )
}

/// Add a song to a playlist at the given order
///
/// Returns `false` when the song was already a member; the existing row,
/// including its order, is left untouched.
pub async fn add(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_id: SongId,
    display_order: i64,
) -> Result<bool> {
    let mut conn = pool.acquire().await?;
    add_with(&mut conn, playlist_id, song_id, display_order).await
}

pub(crate) async fn add_with(
    conn: &mut SqliteConnection,
    playlist_id: PlaylistId,
    song_id: SongId,
    display_order: i64,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO playlist_songs (playlist_id, song_id, display_order)
        VALUES (?, ?, ?)
        ON CONFLICT(playlist_id, song_id) DO NOTHING
        "#,
    )
    .bind(playlist_id.get())
    .bind(song_id.get())
    .bind(display_order)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Upsert each song and add it to the playlist with `display_order = index`
///
/// Runs in one transaction. Songs already in the playlist keep their
/// existing order. Returns how many memberships were created.
pub async fn add_songs(pool: &SqlitePool, playlist_id: PlaylistId, songs: &[Song]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut added = 0;

    for (index, song) in songs.iter().enumerate() {
        crate::songs::upsert_with(&mut *tx, song).await?;
        if add_with(&mut *tx, playlist_id, song.id, index as i64).await? {
            added += 1;
        }
    }

    tx.commit().await?;
    Ok(added)
}

/// Remove a song from a playlist
///
/// Returns `false` if the song was not a member.
pub async fn remove(pool: &SqlitePool, playlist_id: PlaylistId, song_id: SongId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ? AND song_id = ?")
        .bind(playlist_id.get())
        .bind(song_id.get())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Get a single membership
pub async fn get(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_id: SongId,
) -> Result<Option<Membership>> {
    let row = sqlx::query(
        r#"
        SELECT playlist_id, song_id, display_order
        FROM playlist_songs
        WHERE playlist_id = ? AND song_id = ?
        "#,
    )
    .bind(playlist_id.get())
    .bind(song_id.get())
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(membership_from_row))
}

/// Get every membership in insertion order
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Membership>> {
    let rows = sqlx::query(
        "SELECT playlist_id, song_id, display_order FROM playlist_songs ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(membership_from_row).collect())
}

/// Rewrite membership orders in one transaction
///
/// Rows are matched on `(playlist_id, song_id)`; memberships that no longer
/// exist are skipped.
pub async fn update_orders(pool: &SqlitePool, memberships: &[Membership]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for membership in memberships {
        sqlx::query(
            "UPDATE playlist_songs SET display_order = ? WHERE playlist_id = ? AND song_id = ?",
        )
        .bind(membership.display_order)
        .bind(membership.playlist_id.get())
        .bind(membership.song_id.get())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
