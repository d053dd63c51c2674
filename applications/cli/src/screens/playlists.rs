//! Playlists screen
//!
//! Positions on the command line are 1-based, matching the numbered lists
//! this screen prints.

use super::render_songs;
use crate::app::App;
use anyhow::{bail, Context};
use cadence_core::{PlaylistId, PlaylistWithSongs, Song, SongId};
use cadence_state::{PlaylistDialog, PlaylistsUiState, PlaylistsViewState};
use clap::Subcommand;
use std::fmt::Write;

#[derive(Debug, Subcommand)]
pub enum PlaylistCommand {
    /// List playlists in display order
    List,
    /// Show one playlist with its songs
    Show { id: PlaylistId },
    /// Create a playlist
    Create { name: String },
    /// Rename a playlist
    Rename { id: PlaylistId, name: String },
    /// Delete one or more playlists (logged to the audit file)
    Delete {
        #[arg(required = true)]
        ids: Vec<PlaylistId>,
    },
    /// Add device songs to a playlist
    Add {
        id: PlaylistId,
        #[arg(required = true)]
        song_ids: Vec<SongId>,
    },
    /// Remove a song from a playlist
    Remove { id: PlaylistId, song_id: SongId },
    /// Move a playlist to another position
    Move { from: usize, to: usize },
    /// Move a song within a playlist
    MoveSong { id: PlaylistId, from: usize, to: usize },
}

pub async fn run(app: &App, command: PlaylistCommand) -> anyhow::Result<()> {
    let view = PlaylistsViewState::new(app.repository.clone(), app.selection.clone()).await?;

    match command {
        PlaylistCommand::List => {}
        PlaylistCommand::Show { id } => {
            let state = view.state();
            let playlist = state
                .playlist(id)
                .with_context(|| format!("Playlist {id} not found"))?;
            print!("{}", render_playlist(playlist));
            return Ok(());
        }
        PlaylistCommand::Create { name } => {
            view.set_dialog(PlaylistDialog::Create);
            let playlist = view.create_playlist(&name).await?;
            println!("Created playlist {} ({})", playlist.name, playlist.id);
        }
        PlaylistCommand::Rename { id, name } => {
            view.rename_playlist(id, &name).await?;
        }
        PlaylistCommand::Delete { ids } => {
            if let [id] = ids.as_slice() {
                view.delete_playlist(*id).await?;
            } else {
                view.set_edit_mode(true);
                view.toggle_multi_select();
                for id in &ids {
                    view.toggle_selection(*id);
                }
                let deleted = view.delete_selected().await?;
                view.set_edit_mode(false);
                println!("Deleted {} playlists", deleted.len());
            }
        }
        PlaylistCommand::Add { id, song_ids } => {
            view.set_dialog(PlaylistDialog::AddSongs(id));
            let songs = pick_songs(&view.state().local_songs, &song_ids)?;
            let added = view.add_songs(id, &songs).await?;
            println!("Added {added} of {} songs", songs.len());
        }
        PlaylistCommand::Remove { id, song_id } => {
            view.remove_song(id, song_id).await?;
        }
        PlaylistCommand::Move { from, to } => {
            view.move_playlist(zero_based(from)?, zero_based(to)?).await?;
        }
        PlaylistCommand::MoveSong { id, from, to } => {
            view.move_song(id, zero_based(from)?, zero_based(to)?).await?;
            if let Some(playlist) = view.state().playlist(id) {
                print!("{}", render_playlist(playlist));
            }
            return Ok(());
        }
    }

    print!("{}", render_playlists(&view.state()));
    Ok(())
}

/// Resolve song ids against the device scan, keeping the given order
fn pick_songs(local: &[Song], ids: &[SongId]) -> anyhow::Result<Vec<Song>> {
    ids.iter()
        .map(|id| {
            local
                .iter()
                .find(|song| song.id == *id)
                .cloned()
                .with_context(|| format!("Song {id} is not on this device"))
        })
        .collect()
}

fn zero_based(position: usize) -> anyhow::Result<usize> {
    if position == 0 {
        bail!("positions start at 1");
    }
    Ok(position - 1)
}

pub fn render_playlists(state: &PlaylistsUiState) -> String {
    if state.playlists.is_empty() {
        return "No playlists yet.\n".to_string();
    }

    let mut out = String::new();
    for (index, entry) in state.playlists.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {} ({} songs, id {})",
            index + 1,
            entry.playlist.name,
            entry.songs.len(),
            entry.playlist.id
        );
    }
    out
}

pub fn render_playlist(entry: &PlaylistWithSongs) -> String {
    let mut out = format!("{} (id {})\n", entry.playlist.name, entry.playlist.id);
    let songs = entry.songs_in_display_order();
    if songs.is_empty() {
        out.push_str("  (empty)\n");
    } else {
        render_songs(&mut out, &songs, "  ");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{Membership, Playlist};

    fn song(id: i64, title: &str) -> Song {
        Song::new(SongId::new(id), title, "Artist", 120_000, format!("file:///{title}.mp3"))
    }

    #[test]
    fn playlist_renders_in_display_order() {
        let pid = PlaylistId::new(4);
        let entry = PlaylistWithSongs {
            playlist: Playlist::new(pid, "Focus", 0),
            songs: vec![song(1, "A"), song(2, "B")],
            memberships: vec![Membership::new(pid, SongId::new(1), 1), Membership::new(pid, SongId::new(2), 0)],
        };

        let text = render_playlist(&entry);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Focus (id 4)");
        assert!(lines[1].contains("1. B"));
        assert!(lines[2].contains("2. A"));
    }

    #[test]
    fn empty_list() {
        assert_eq!(render_playlists(&PlaylistsUiState::default()), "No playlists yet.\n");
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(zero_based(1).unwrap(), 0);
        assert!(zero_based(0).is_err());
    }

    #[test]
    fn unknown_song_ids_are_reported() {
        let local = vec![song(1, "A")];
        assert_eq!(pick_songs(&local, &[SongId::new(1)]).unwrap().len(), 1);
        assert!(pick_songs(&local, &[SongId::new(2)]).is_err());
    }
}
