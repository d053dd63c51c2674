/// Cadence - playlist-driven music player for the terminal
use cadence_cli::{
    app::App,
    config::CadenceConfig,
    screens::{self, playlists::PlaylistCommand, settings::SettingsCommand},
};
use cadence_core::PlaylistId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Playlist-driven music player", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./cadence.toml if present)
    #[arg(short, long, global = true, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage playlists
    #[command(subcommand)]
    Playlists(PlaylistCommand),
    /// List every song found on this device
    Songs,
    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Interactive player
    Play {
        /// Playlist to play (default: every device song)
        #[arg(short, long)]
        playlist: Option<PlaylistId>,
        /// Start playing immediately
        #[arg(long)]
        autoplay: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CadenceConfig::load(cli.config.as_deref())?;
    config.validate()?;
    let app = App::open(config).await?;

    match cli.command {
        Commands::Playlists(command) => screens::playlists::run(&app, command).await?,
        Commands::Songs => screens::songs::run(&app).await?,
        Commands::Settings(command) => screens::settings::run(&app, command)?,
        Commands::Play { playlist, autoplay } => screens::player::run(&app, playlist, autoplay).await?,
    }

    Ok(())
}
