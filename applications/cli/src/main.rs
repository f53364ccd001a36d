/// rMusic CLI - tools for a cloud-stored music library
use clap::{Parser, Subcommand};
use rmusic_cli::{
    check_playlist, connect, export_library, generate_playlist, render_playlist, AppConfig,
};
use rmusic_core::{load_playlist, FileStore, TagReader};
use rmusic_metadata::LoftyTagReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rmusic-cli")]
#[command(about = "rMusic library tools", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./rmusic.toml if present)
    #[arg(short, long, global = true, env = "RMUSIC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a playlist file listing every audio file in the songs folder
    Generate {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export title/artist for every audio file as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Files processed at the same time (overrides config)
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Play the configured playlist end to end without audio output
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rmusic=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        if let Some(setup) = err.setup() {
            eprintln!("{}\n\n{}", setup, setup.remediation());
            std::process::exit(2);
        }
        return Err(err.into());
    }

    Ok(())
}

async fn run(cli: Cli) -> rmusic_cli::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;

    if let Commands::Export {
        concurrency: Some(concurrency),
        ..
    } = &cli.command
    {
        config.export.concurrency = *concurrency;
    }
    config.validate()?;

    let store: Arc<dyn FileStore> = Arc::new(connect(&config)?);
    let reader: Arc<dyn TagReader> = Arc::new(LoftyTagReader::new());

    match cli.command {
        Commands::Generate { output } => {
            let playlist = generate_playlist(store.as_ref(), &config.library).await?;
            emit(output.as_deref(), &render_playlist(&playlist)).await?;
        }
        Commands::Export { output, .. } => {
            let export =
                export_library(store, reader, &config.library, config.export.concurrency).await?;
            let json = serde_json::to_string_pretty(&export.entries)?;
            emit(output.as_deref(), &json).await?;
        }
        Commands::Check => {
            let playlist = load_playlist(store.as_ref(), &config.library).await?;
            let report = check_playlist(playlist, store, reader, config.playback).await?;

            for track in &report.played {
                println!("{:>4}  {} - {}", track.index, track.artist, track.title);
            }
            for skipped in &report.skipped {
                println!("skipped {:>4}  {}: {}", skipped.index, skipped.track_id, skipped.reason);
            }
        }
    }

    Ok(())
}

async fn emit(output: Option<&Path>, contents: &str) -> rmusic_cli::Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, contents).await?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", contents.trim_end()),
    }
    Ok(())
}
