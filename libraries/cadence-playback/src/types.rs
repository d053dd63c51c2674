//! Core types for the playback engine

use cadence_core::Song;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Nothing loaded
    Idle,

    /// Media is loading; the buffering watchdog is armed
    Buffering,

    /// Media loaded and positioned, not playing
    Ready,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Reached the end of the queue
    Ended,

    /// The last item failed and nothing was left to advance to
    Error,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when queue ends
    #[default]
    Off,

    /// Loop entire queue
    All,

    /// Loop current track only
    One,
}

impl RepeatMode {
    /// Next mode in the Off → All → One → Off cycle
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

/// Configuration for the playback engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How long a load may stay in buffering before the track is failed (default: 15 s)
    pub buffering_timeout: Duration,

    /// Past this position, "previous" restarts the current track (default: 3 s)
    pub restart_threshold: Duration,

    /// Initial shuffle state (default: off)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buffering_timeout: Duration::from_secs(15),
            restart_threshold: Duration::from_secs(3),
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

/// Point-in-time view of the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub state: EngineState,
    pub is_playing: bool,
    pub current: Option<Song>,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub queue_len: usize,
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self {
            state: EngineState::Idle,
            is_playing: false,
            current: None,
            position_ms: 0,
            duration_ms: 0,
            shuffle: false,
            repeat: RepeatMode::Off,
            queue_len: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.buffering_timeout, Duration::from_secs(15));
        assert_eq!(config.restart_threshold, Duration::from_secs(3));
        assert!(!config.shuffle);
        assert_eq!(config.repeat, RepeatMode::Off);
    }

    #[test]
    fn repeat_cycles_through_all_modes() {
        let mut mode = RepeatMode::Off;
        let mut seen = Vec::new();
        for _ in 0..4 {
            mode = mode.cycle();
            seen.push(mode);
        }
        assert_eq!(seen, vec![RepeatMode::All, RepeatMode::One, RepeatMode::Off, RepeatMode::All]);
    }
}
