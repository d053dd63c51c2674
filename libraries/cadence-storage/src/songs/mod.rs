use cadence_core::{error::Result, types::*};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

/// Build a song from a row carrying the `songs` columns
///
/// The id column is read from `song_id` when present (join queries) and
/// from `id` otherwise.
pub(crate) fn song_from_row(row: &SqliteRow, id_column: &str) -> Song {
    let duration_ms: i64 = row.get("duration_ms");
    Song {
        id: SongId::new(row.get(id_column)),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        duration_ms: duration_ms.max(0) as u64,
        uri: row.get("uri"),
    }
}

/// Insert or replace a song row
pub async fn upsert(pool: &SqlitePool, song: &Song) -> Result<()> {
    let mut conn = pool.acquire().await?;
    upsert_with(&mut conn, song).await
}

/// Insert or replace a song row on an existing connection or transaction
pub(crate) async fn upsert_with(conn: &mut SqliteConnection, song: &Song) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO songs (id, title, artist, album, duration_ms, uri)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            artist = excluded.artist,
            album = excluded.album,
            duration_ms = excluded.duration_ms,
            uri = excluded.uri
        "#,
    )
    .bind(song.id.get())
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.album)
    .bind(song.duration_ms as i64)
    .bind(&song.uri)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Get a cached song by id
pub async fn get_by_id(pool: &SqlitePool, id: SongId) -> Result<Option<Song>> {
    let row = sqlx::query(
        "SELECT id, title, artist, album, duration_ms, uri FROM songs WHERE id = ?",
    )
    .bind(id.get())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| song_from_row(&row, "id")))
}

/// Get every cached song, by title
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows = sqlx::query(
        "SELECT id, title, artist, album, duration_ms, uri FROM songs ORDER BY title, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| song_from_row(row, "id")).collect())
}
