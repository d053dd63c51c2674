//! Terminal screens
//!
//! Each screen drives one view-state: subcommands become intents, and the
//! published state is rendered as plain text.

pub mod player;
pub mod playlists;
pub mod settings;
pub mod songs;

use cadence_core::Song;
use std::fmt::Write;

/// `m:ss` (or `h:mm:ss` past an hour)
pub fn format_duration(ms: u64) -> String {
    let total = ms / 1000;
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// One numbered line per song
pub fn render_songs(out: &mut String, songs: &[Song], indent: &str) {
    for (index, song) in songs.iter().enumerate() {
        let _ = writeln!(
            out,
            "{indent}{:>3}. {} - {} [{}] (id {})",
            index + 1,
            song.title,
            song.artist,
            format_duration(song.duration_ms),
            song.id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::SongId;

    #[test]
    fn durations() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(103_000), "1:43");
        assert_eq!(format_duration(3_723_000), "1:02:03");
    }

    #[test]
    fn songs_are_numbered_from_one() {
        let songs = vec![
            Song::new(SongId::new(7), "Intro", "Band", 61_000, "file:///a.mp3"),
            Song::new(SongId::new(-2), "The Messenger", "Silent Partner", 192_000, "https://x/y.mp3"),
        ];
        let mut out = String::new();
        render_songs(&mut out, &songs, "  ");
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "    1. Intro - Band [1:01] (id 7)");
        assert_eq!(lines[1], "    2. The Messenger - Silent Partner [3:12] (id -2)");
    }
}
