//! Tubelink CLI - Source Inspection and Playback Simulation
//!
//! Features:
//! - Source resolution (video ids and playlists)
//! - Embed spec inspection
//! - Media-control layout dump
//! - Scripted playback sessions against a simulated SDK

use clap::{Parser, Subcommand};

mod commands;
mod output;

/// Tubelink CLI - Playback adapter toolkit
#[derive(Parser)]
#[command(name = "tubelink-cli")]
#[command(author = "Purple Squirrel Media")]
#[command(version)]
#[command(about = "Playback adapter inspection and simulation toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json, table)
    #[arg(short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve sources into playable media identifiers
    Resolve {
        /// URLs or paths to inspect
        sources: Vec<String>,
    },

    /// Show the embed spec built for a source
    Spec {
        /// URL to resolve
        source: String,
    },

    /// Print the media-control layout advertised to hosts
    Layout,

    /// Run a scripted playback session against the simulated SDK
    Simulate {
        /// URL to play
        source: String,

        /// Seconds to keep the session running
        #[arg(short, long, default_value = "3")]
        watch: u64,

        /// Simulated video length in seconds
        #[arg(long, default_value = "30")]
        video_duration: f64,

        /// Pause playback after this many milliseconds
        #[arg(long)]
        pause_after: Option<u64>,

        /// Advertise related videos when playback ends
        #[arg(long)]
        show_related: bool,

        /// Treat the SDK as already present
        #[arg(long)]
        preloaded: bool,

        /// Poller period in milliseconds
        #[arg(long, default_value = "100")]
        poll_interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .init();

    match cli.command {
        Commands::Resolve { sources } => {
            commands::resolve(&sources, &cli.format)?;
        }
        Commands::Spec { source } => {
            commands::spec(&source, &cli.format)?;
        }
        Commands::Layout => {
            commands::layout(&cli.format);
        }
        Commands::Simulate {
            source,
            watch,
            video_duration,
            pause_after,
            show_related,
            preloaded,
            poll_interval_ms,
        } => {
            let script = commands::SimulateScript {
                watch_secs: watch,
                video_duration,
                pause_after_ms: pause_after,
                show_related,
                preloaded,
                poll_interval_ms,
            };
            commands::simulate(&source, script, &cli.format).await?;
        }
    }

    Ok(())
}
