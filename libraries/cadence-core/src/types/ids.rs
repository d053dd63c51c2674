/// ID types for Cadence entities
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Song identifier
///
/// Device songs carry a stable, positive id derived from the media index.
/// Built-in tracks use small negative constants so they can never collide
/// with a scanned song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct SongId(i64);

impl SongId {
    /// Create a song ID from its raw value
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether this id belongs to the built-in track range
    pub const fn is_builtin(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SongId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for SongId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Playlist identifier (store-assigned, monotonically increasing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct PlaylistId(i64);

impl PlaylistId {
    /// Create a playlist ID from its raw value
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlaylistId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for PlaylistId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
