mod ids;
mod playlist;
mod song;

pub use ids::{PlaylistId, SongId};
pub use playlist::{Membership, Playlist, PlaylistWithSongs};
pub use song::Song;
