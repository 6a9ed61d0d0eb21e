mod cli;
mod config;
mod copier;
mod events;
mod folders;
mod locate;

use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use cli::Cli;
use config::Settings;
use events::HookEvent;
use locate::{strategy_for_source, Strategy};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.verbose)?;
    info!("starting subtitle importer {}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load()?;

    match HookEvent::from_env()? {
        HookEvent::MovieDownload {
            source_folder,
            destination_path,
        } => {
            info!("handling movie Download event");
            handle_movie_download(&source_folder, &destination_path, &settings, cli.dry_run)?;
        }
        HookEvent::EpisodeDownload {
            destination_path,
            source_path,
            source_folder,
        } => {
            info!("handling episode Download event");
            handle_episode_download(
                &destination_path,
                &source_path,
                &source_folder,
                &settings,
                cli.dry_run,
            )?;
        }
        HookEvent::Test => {
            info!("handling Test event, nothing to do");
        }
        HookEvent::Unhandled(event_type) => {
            warn!("unhandled event: {event_type:?}");
        }
    }

    Ok(())
}

fn handle_movie_download(
    source_folder: &Path,
    destination_path: &Path,
    settings: &Settings,
    dry_run: bool,
) -> Result<()> {
    let subs_folder = folders::movie_subs_folder(source_folder);
    let strategy = source_strategy(source_folder, settings);
    copy_from_folder(&subs_folder, destination_path, strategy, dry_run)
}

fn handle_episode_download(
    destination_path: &Path,
    source_path: &Path,
    source_folder: &Path,
    settings: &Settings,
    dry_run: bool,
) -> Result<()> {
    let Some(subs_folder) = folders::episode_subs_folder(source_folder, source_path)? else {
        // Already logged; the media file stays subtitle-less but the
        // invocation itself succeeded.
        return Ok(());
    };
    let strategy = source_strategy(source_folder, settings);
    copy_from_folder(&subs_folder, destination_path, strategy, dry_run)
}

fn source_strategy(source_folder: &Path, settings: &Settings) -> Strategy {
    let folder_name = source_folder
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let strategy = strategy_for_source(folder_name, &settings.markers);
    info!("using {strategy:?} strategy for {folder_name}");
    strategy
}

fn copy_from_folder(
    subs_folder: &Path,
    destination_path: &Path,
    strategy: Strategy,
    dry_run: bool,
) -> Result<()> {
    if !subs_folder.is_dir() {
        info!("no {} found, nothing to do", subs_folder.display());
        return Ok(());
    }
    info!("{} exists", subs_folder.display());

    let located = locate::locate_subtitles(subs_folder, strategy)?;
    let copied = copier::copy_subtitles(&located, destination_path, dry_run);
    info!("copied {copied} subtitle file(s)");
    Ok(())
}

/// Info lines go to stderr; with `--verbose`, debug detail additionally
/// goes to stdout. Matches how the hook's callers capture its output.
fn setup_logging(verbose: bool) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(LevelFilter::INFO);

    let stdout_layer = verbose.then(|| {
        fmt::layer()
            .with_writer(io::stdout)
            .with_target(false)
            .with_filter(LevelFilter::DEBUG)
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    Ok(())
}
