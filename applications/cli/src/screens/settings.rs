/// Settings screen
use crate::app::App;
use cadence_state::{SettingsUiState, SettingsViewState};
use clap::{Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show current settings
    Show,
    /// Allow or forbid the built-in fallback tracks
    Builtins {
        #[arg(value_enum)]
        state: Toggle,
    },
}

pub fn run(app: &App, command: SettingsCommand) -> anyhow::Result<()> {
    let view = SettingsViewState::new(app.settings.clone());
    if let SettingsCommand::Builtins { state } = command {
        view.set_built_in_music_enabled(state == Toggle::On)?;
    }
    print!("{}", render(&view.state()));
    Ok(())
}

pub fn render(state: &SettingsUiState) -> String {
    let builtins = if state.built_in_music_enabled { "on" } else { "off" };
    format!("Built-in music: {builtins}\n")
}
