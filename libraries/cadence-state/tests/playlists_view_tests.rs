//! Playlists screen behaviour over a real store


use cadence_core::{CadenceError, PlaylistId};
use cadence_state::{PlaylistDialog, PlaylistsViewState};
use test_helpers::*;

async fn view(app: &TestApp) -> PlaylistsViewState {
    PlaylistsViewState::new(app.repo.clone(), app.selection.clone())
        .await
        .expect("Failed to create view-state")
}

#[tokio::test]
async fn test_initial_state_lists_device_songs() {
    let app = TestApp::new(vec![device_song(1, "A"), device_song(2, "B")], true).await;
    let view = view(&app).await;

    let state = view.state();
    assert!(state.playlists.is_empty());
    assert_eq!(state.local_songs.len(), 2);
    assert_eq!(state.dialog, PlaylistDialog::Hidden);
    assert!(!state.is_edit_mode);
}

#[tokio::test]
async fn test_create_appends_and_closes_dialog() {
    let app = TestApp::new(vec![], true).await;
    let view = view(&app).await;

    view.set_dialog(PlaylistDialog::Create);
    view.create_playlist("Morning").await.unwrap();
    view.create_playlist("  Evening ").await.unwrap();

    let state = view.state();
    assert_eq!(state.dialog, PlaylistDialog::Hidden);
    let names: Vec<_> = state.playlists.iter().map(|p| p.playlist.name.as_str()).collect();
    assert_eq!(names, vec!["Morning", "Evening"]);
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let app = TestApp::new(vec![], true).await;
    let view = view(&app).await;

    let err = view.create_playlist("   ").await.unwrap_err();
    assert!(matches!(err, CadenceError::InvalidInput(_)));
    assert!(view.state().playlists.is_empty());
}

#[tokio::test]
async fn test_rename_missing_playlist_fails() {
    let app = TestApp::new(vec![], true).await;
    let view = view(&app).await;

    let err = view.rename_playlist(PlaylistId::new(404), "Nope").await.unwrap_err();
    assert!(matches!(err, CadenceError::PlaylistNotFound(_)));
}

#[tokio::test]
async fn test_focus_reorder_persists_contiguous_orders() {
    let songs = vec![device_song(1, "A"), device_song(2, "B"), device_song(3, "C")];
    let app = TestApp::new(songs.clone(), true).await;
    let view = view(&app).await;

    let focus = view.create_playlist("Focus").await.unwrap();
    assert_eq!(view.add_songs(focus.id, &songs).await.unwrap(), 3);

    view.move_song(focus.id, 2, 0).await.unwrap();

    let mut orders: Vec<_> = app
        .repo
        .memberships()
        .await
        .unwrap()
        .into_iter()
        .map(|m| (m.song_id.get(), m.display_order))
        .collect();
    orders.sort_by_key(|(_, order)| *order);
    assert_eq!(orders, vec![(3, 0), (1, 1), (2, 2)]);

    let state = view.state();
    let titles: Vec<_> = state
        .playlist(focus.id)
        .unwrap()
        .songs_in_display_order()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, vec!["C", "A", "B"]);
}

#[tokio::test]
async fn test_move_playlist_rewrites_all_orders() {
    let app = TestApp::new(vec![], true).await;
    let view = view(&app).await;
    for name in ["One", "Two", "Three", "Four"] {
        view.create_playlist(name).await.unwrap();
    }

    view.move_playlist(0, 3).await.unwrap();

    let state = view.state();
    let listed: Vec<_> = state
        .playlists
        .iter()
        .map(|p| (p.playlist.name.as_str(), p.playlist.display_order))
        .collect();
    assert_eq!(listed, vec![("Two", 0), ("Three", 1), ("Four", 2), ("One", 3)]);
}

#[tokio::test]
async fn test_move_out_of_range_is_rejected() {
    let app = TestApp::new(vec![], true).await;
    let view = view(&app).await;
    view.create_playlist("Only").await.unwrap();

    assert!(matches!(view.move_playlist(0, 1).await, Err(CadenceError::InvalidInput(_))));
}

#[tokio::test]
async fn test_delete_selected_is_one_audit_batch() {
    let app = TestApp::new(vec![], true).await;
    let view = view(&app).await;
    let a = view.create_playlist("A").await.unwrap();
    let b = view.create_playlist("B").await.unwrap();
    let c = view.create_playlist("C").await.unwrap();

    view.set_edit_mode(true);
    view.toggle_multi_select();
    view.toggle_selection(a.id);
    view.toggle_selection(c.id);
    view.toggle_selection(b.id);
    view.toggle_selection(b.id);

    let deleted = view.delete_selected().await.unwrap();
    assert_eq!(deleted.len(), 2);

    let state = view.state();
    assert!(!state.is_multi_select);
    assert!(state.selected_ids.is_empty());
    assert_eq!(state.playlists.len(), 1);
    assert_eq!(state.playlists[0].playlist.id, b.id);

    let audit = app.audit_text();
    assert_eq!(audit.matches("--- Deleted Playlists on").count(), 1);
    assert!(audit.contains(&format!("ID: {}, Name: A", a.id)));
    assert!(audit.contains(&format!("ID: {}, Name: C", c.id)));
}

#[tokio::test]
async fn test_leaving_edit_mode_clears_selection() {
    let app = TestApp::new(vec![], true).await;
    let view = view(&app).await;
    let p = view.create_playlist("P").await.unwrap();

    view.set_edit_mode(true);
    view.toggle_multi_select();
    view.toggle_selection(p.id);
    assert_eq!(view.state().selected_ids.len(), 1);

    view.set_edit_mode(false);
    let state = view.state();
    assert!(!state.is_edit_mode);
    assert!(!state.is_multi_select);
    assert!(state.selected_ids.is_empty());
}

#[tokio::test]
async fn test_deleting_active_playlist_clears_playback_selection() {
    let app = TestApp::new(vec![], true).await;
    let view = view(&app).await;
    let p = view.create_playlist("P").await.unwrap();

    view.select_for_playback(Some(p.id));
    view.toggle_expanded(p.id);
    assert_eq!(app.selection.active(), Some(p.id));

    view.set_dialog(PlaylistDialog::DeleteConfirm(p.clone()));
    view.delete_playlist(p.id).await.unwrap();

    assert_eq!(app.selection.active(), None);
    let state = view.state();
    assert_eq!(state.expanded_id, None);
    assert_eq!(state.dialog, PlaylistDialog::Hidden);
    assert_eq!(app.audit_text().matches("--- Deleted Playlists on").count(), 1);
}

#[tokio::test]
async fn test_toggle_expanded_collapses_on_second_tap() {
    let app = TestApp::new(vec![], true).await;
    let view = view(&app).await;
    let p = view.create_playlist("P").await.unwrap();

    view.toggle_expanded(p.id);
    assert_eq!(view.state().expanded_id, Some(p.id));
    view.toggle_expanded(p.id);
    assert_eq!(view.state().expanded_id, None);
}

#[tokio::test]
async fn test_external_writes_reach_the_view() {
    let app = TestApp::new(vec![], true).await;
    let view = view(&app).await;

    app.repo.create_playlist("From elsewhere").await.unwrap();

    let rx = view.subscribe();
    eventually("live playlist update", || rx.borrow().playlists.len() == 1).await;
}
