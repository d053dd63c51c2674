/// All-songs screen
use super::render_songs;
use crate::app::App;
use cadence_state::{AllSongsUiState, AllSongsViewState};
use std::fmt::Write;

pub async fn run(app: &App) -> anyhow::Result<()> {
    let view = AllSongsViewState::new(app.repository.clone());
    view.refresh().await?;
    print!("{}", render(&view.state()));
    Ok(())
}

pub fn render(state: &AllSongsUiState) -> String {
    let mut out = String::new();
    if state.is_loading {
        out.push_str("Scanning...\n");
    } else if state.songs.is_empty() {
        out.push_str("No songs found on this device.\n");
    } else {
        let _ = writeln!(out, "{} songs", state.songs.len());
        render_songs(&mut out, &state.songs, "");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_loading() {
        assert_eq!(render(&AllSongsUiState::default()), "No songs found on this device.\n");
        let loading = AllSongsUiState {
            is_loading: true,
            ..AllSongsUiState::default()
        };
        assert_eq!(render(&loading), "Scanning...\n");
    }
}
