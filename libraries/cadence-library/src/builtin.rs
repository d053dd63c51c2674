//! Built-in fallback tracks
//!
//! Three freely licensed remote tracks that stand in for (or lead) the device
//! library while the built-in music setting is on. They are never stored.

use cadence_core::{Song, SongId};

/// Ids reserved for built-in tracks
pub const BUILTIN_IDS: [SongId; 3] = [SongId::new(-1), SongId::new(-2), SongId::new(-3)];

/// The fixed built-in track list, in play order
pub fn builtin_songs() -> Vec<Song> {
    vec![
        Song::new(
            BUILTIN_IDS[0],
            "Jazz In Paris",
            "Media Right Productions",
            103_000,
            "https://storage.googleapis.com/exoplayer-test-media-0/Jazz_In_Paris.mp3",
        ),
        Song::new(
            BUILTIN_IDS[1],
            "The Messenger",
            "Silent Partner",
            130_000,
            "https://storage.googleapis.com/exoplayer-test-media-1/the-messenger.mp3",
        ),
        Song::new(
            BUILTIN_IDS[2],
            "Talkies",
            "Huma-Huma",
            100_000,
            "https://storage.googleapis.com/exoplayer-test-media-0/Talkies.mp3",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_remote_with_reserved_ids() {
        let songs = builtin_songs();
        assert_eq!(songs.len(), 3);
        for (song, id) in songs.iter().zip(BUILTIN_IDS) {
            assert_eq!(song.id, id);
            assert!(song.is_builtin());
            assert!(song.is_remote());
            assert!(song.album.is_empty());
        }
    }
}
