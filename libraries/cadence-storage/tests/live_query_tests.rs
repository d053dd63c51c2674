//! Live query tests: every store write must be visible to open views

mod test_helpers;

use cadence_core::types::*;
use std::time::Duration;
use test_helpers::*;

#[tokio::test]
async fn test_watch_playlists_sees_create_and_delete() {
    let test_db = TestDb::new().await;
    let store = test_db.store();

    let mut live = store.watch_playlists();
    assert!(live.current().await.unwrap().is_empty());

    let created = store.create_playlist("Live").await.unwrap();
    let after_create = live.changed().await.unwrap().unwrap();
    assert_eq!(after_create.len(), 1);
    assert_eq!(after_create[0].playlist.id, created.id);

    store.delete_playlists(&[created.id]).await.unwrap();
    let after_delete = live.changed().await.unwrap().unwrap();
    assert!(after_delete.is_empty());
}

#[tokio::test]
async fn test_watch_playlist_tracks_membership_changes() {
    let test_db = TestDb::new().await;
    let store = test_db.store();

    let playlist = store.create_playlist("Tracked").await.unwrap();
    let mut live = store.watch_playlist(playlist.id);
    assert!(live.current().await.unwrap().unwrap().songs.is_empty());

    store
        .add_songs_to_playlist(playlist.id, &[test_song(1, "One"), test_song(2, "Two")])
        .await
        .unwrap();
    let pws = live.changed().await.unwrap().unwrap().unwrap();
    assert_eq!(pws.songs.len(), 2);

    store.remove_song_from_playlist(playlist.id, SongId::new(1)).await.unwrap();
    let pws = live.changed().await.unwrap().unwrap().unwrap();
    assert_eq!(pws.songs.len(), 1);

    store.delete_playlists(&[playlist.id]).await.unwrap();
    assert!(live.changed().await.unwrap().unwrap().is_none());
}

#[tokio::test]
async fn test_changed_waits_for_a_write() {
    let test_db = TestDb::new().await;
    let store = test_db.store();
    let mut live = store.watch_playlists();

    let pending = tokio::time::timeout(Duration::from_millis(50), live.changed()).await;
    assert!(pending.is_err(), "no write happened yet");

    store.create_playlist("Now").await.unwrap();
    let seen = tokio::time::timeout(Duration::from_secs(5), live.changed())
        .await
        .expect("write should wake the view")
        .unwrap()
        .unwrap();
    assert_eq!(seen.len(), 1);
}

#[tokio::test]
async fn test_failed_write_does_not_bump_revision() {
    let test_db = TestDb::new().await;
    let store = test_db.store();
    let before = store.revision();

    assert!(store.rename_playlist(PlaylistId::new(77), "Ghost").await.is_err());
    assert_eq!(store.revision(), before);

    store.create_playlist("Real").await.unwrap();
    assert_eq!(store.revision(), before + 1);
}

#[tokio::test]
async fn test_changed_ends_when_store_is_dropped() {
    let test_db = TestDb::new().await;
    let store = test_db.store();
    let mut live = store.watch_playlists();

    drop(store);
    assert!(live.changed().await.is_none());
}
