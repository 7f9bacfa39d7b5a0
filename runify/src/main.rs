//! runify - running-cadence playlist curator
//!
//! Reads a source playlist, keeps the tracks whose tempo suits the
//! configured running cadence (directly or at double time), orders them by
//! effective tempo and publishes them as a new playlist.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use runify::config::{load_runify_config, Settings};
use runify::services::{obtain_tokens, SpotifyAuth, SpotifyClient};
use runify::workflow::{PipelineConfig, RunifyPipeline};

/// Command-line arguments for runify
#[derive(Parser, Debug)]
#[command(name = "runify")]
#[command(about = "Build a running-cadence playlist from an existing playlist")]
#[command(version)]
struct Args {
    /// Source playlist: share link or bare playlist id
    #[arg(short, long)]
    url: String,

    /// Name of the playlist to create
    #[arg(short, long)]
    name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // .env is optional; real environment variables win over it
    let dotenv_path = dotenvy::dotenv().ok();

    let (config, config_path) =
        load_runify_config().context("Failed to load configuration file")?;

    // Initialize tracing (RUST_LOG overrides the configured level)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("runify={}", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting runify v{} [{}] ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => warn!("No config file found, using environment and built-in defaults"),
    }
    if let Some(path) = &dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    let settings = Settings::resolve(&config).context("Invalid configuration")?;
    info!(
        user = %settings.username,
        lower_bpm = settings.band.lower_bound(),
        upper_bpm = settings.band.upper_bound(),
        on_missing_analysis = settings.collector.on_missing_analysis.as_str(),
        concurrency = settings.collector.concurrency,
        "Settings resolved"
    );

    let auth = SpotifyAuth::new(
        settings.credentials.clone(),
        &settings.accounts_base_url,
        settings.client.timeout,
    )?;
    let tokens = obtain_tokens(
        &auth,
        settings.access_token.as_deref(),
        settings.refresh_token.as_deref(),
    )
    .await
    .context("Failed to establish a session")?;

    let client = SpotifyClient::new(tokens.access_token, settings.client.clone())
        .context("Failed to initialize API client")?;

    let pipeline_config = PipelineConfig {
        owner: settings.username.clone(),
        band: settings.band,
        collector: settings.collector,
    };

    let summary = RunifyPipeline::new(&client, pipeline_config)
        .run(&args.url, &args.name)
        .await
        .with_context(|| format!("Failed to build playlist '{}'", args.name))?;

    info!(
        source = %summary.source_playlist_id,
        entries = summary.entries_fetched,
        collected = summary.tracks_collected,
        skipped = summary.tracks_skipped,
        candidates = summary.candidates,
        playlist_id = %summary.playlist_id,
        appended = summary.tracks_appended,
        "Run complete"
    );

    Ok(())
}
