//! Interactive player screen
//!
//! Reads one command per line from stdin and redraws the player state after
//! each command and whenever the current song changes.

use super::format_duration;
use crate::app::App;
use cadence_core::PlaylistId;
use cadence_playback::{EngineEvent, RepeatMode};
use cadence_state::{PlayerUiState, PlayerViewState, SettingsViewState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

pub const HELP: &str = "\
commands:
  p               play / pause
  n               next song
  b               previous song (restarts after 3 s)
  s               toggle shuffle
  r               cycle repeat (off, all, one)
  select <id>     play a playlist
  select device   play every device song
  builtins on|off allow the built-in tracks
  l               show status
  h               this help
  q               quit
";

/// A parsed line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    PlayPause,
    Next,
    Previous,
    Shuffle,
    Repeat,
    Select(Option<PlaylistId>),
    BuiltIns(bool),
    Status,
    Help,
    Quit,
}

impl PlayerInput {
    /// Parse one input line; `None` for blank or unknown input
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = words.next()?;
        let arg = words.next();
        let input = match (command, arg) {
            ("p" | "play" | "pause", None) => Self::PlayPause,
            ("n" | "next", None) => Self::Next,
            ("b" | "prev" | "previous", None) => Self::Previous,
            ("s" | "shuffle", None) => Self::Shuffle,
            ("r" | "repeat", None) => Self::Repeat,
            ("select", Some("device")) => Self::Select(None),
            ("select", Some(id)) => Self::Select(Some(id.parse().ok()?)),
            ("builtins", Some("on")) => Self::BuiltIns(true),
            ("builtins", Some("off")) => Self::BuiltIns(false),
            ("l" | "status", None) => Self::Status,
            ("h" | "help" | "?", None) => Self::Help,
            ("q" | "quit" | "exit", None) => Self::Quit,
            _ => return None,
        };
        Some(input)
    }
}

/// What the loop does after an input has been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Redraw,
    Help,
    Quit,
}

/// Apply one input to the player
///
/// Selection and built-in changes only update the shared inputs; the player
/// view-state rebuilds the queue when it sees them.
pub async fn apply(
    app: &App,
    player: &PlayerViewState,
    settings: &SettingsViewState,
    input: PlayerInput,
) -> anyhow::Result<Step> {
    match input {
        PlayerInput::PlayPause => player.play_pause().await,
        PlayerInput::Next => {
            if !player.skip_next().await {
                println!("end of queue");
            }
        }
        PlayerInput::Previous => player.skip_previous().await,
        PlayerInput::Shuffle => {
            player.toggle_shuffle().await;
        }
        PlayerInput::Repeat => {
            player.cycle_repeat().await;
        }
        PlayerInput::Select(id) => app.selection.select(id),
        PlayerInput::BuiltIns(enabled) => settings.set_built_in_music_enabled(enabled)?,
        PlayerInput::Status => {}
        PlayerInput::Help => return Ok(Step::Help),
        PlayerInput::Quit => return Ok(Step::Quit),
    }
    Ok(Step::Redraw)
}

pub async fn run(app: &App, playlist: Option<PlaylistId>, autoplay: bool) -> anyhow::Result<()> {
    app.selection.select(playlist);

    let engine = app.start_engine();
    let mut events = engine.events();
    let player = PlayerViewState::new(engine, app.queue_source()).await?;
    let settings = SettingsViewState::new(app.settings.clone());

    if autoplay {
        player.play_pause().await;
    }

    println!("{HELP}");
    println!("{}", render(&player.state()));

    let mut state = player.subscribe();
    let mut last_song = state.borrow_and_update().current.as_ref().map(|s| s.id);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let Some(input) = PlayerInput::parse(&line) else {
                    if !line.trim().is_empty() {
                        println!("unknown command, type h for help");
                    }
                    continue;
                };
                match apply(app, &player, &settings, input).await? {
                    Step::Redraw => println!("{}", render(&player.state())),
                    Step::Help => println!("{HELP}"),
                    Step::Quit => break,
                }
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = state.borrow_and_update().current.as_ref().map(|s| s.id);
                if current != last_song {
                    last_song = current;
                    println!("{}", render(&player.state()));
                }
            }
            event = events.recv() => match event {
                Ok(EngineEvent::TrackFailed { song_id, reason }) => {
                    println!("skipped song {song_id}: {reason}");
                }
                Ok(EngineEvent::QueueExhausted) => println!("nothing left to play"),
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    player.engine().stop().await;
    tracing::info!(failed = app.failed.len(), "Player closed");
    Ok(())
}

pub fn render(state: &PlayerUiState) -> String {
    let status = if state.is_playing { ">" } else { "||" };
    let repeat = match state.repeat {
        RepeatMode::Off => "off",
        RepeatMode::All => "all",
        RepeatMode::One => "one",
    };
    let shuffle = if state.shuffle { "on" } else { "off" };

    let now = match &state.current {
        Some(song) => format!(
            "{status} {} - {}  {} / {}",
            song.title,
            song.artist,
            format_duration(state.position_ms),
            format_duration(state.duration_ms)
        ),
        None => "(nothing queued)".to_string(),
    };
    format!("{now}\n   queue {}  shuffle {shuffle}  repeat {repeat}", state.queue_len)
}
