//! Codereel CLI: record code typing animations from the terminal.
//!
//! Usage:
//!   codereel record <INPUT>    Record a typing animation to WebM
//!   codereel gif <INPUT>       Render a typing animation to animated GIF
//!   codereel check             Check host capabilities
//!   codereel settings          Show or initialize persisted settings

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod scene;

#[derive(Parser)]
#[command(
    name = "codereel",
    about = "Turn pasted code into typing-animation recordings",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a typing animation to a WebM video
    Record {
        /// Source file whose text is replayed as the animation
        input: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = "recording.webm")]
        output: PathBuf,

        /// Capture frame rate
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Output width in logical pixels (defaults to saved settings)
        #[arg(long)]
        width: Option<u32>,

        /// Output height in logical pixels (defaults to saved settings)
        #[arg(long)]
        height: Option<u32>,

        /// Per-character delay in milliseconds (defaults to saved settings)
        #[arg(long)]
        typing_speed_ms: Option<u64>,
    },

    /// Render a typing animation to an animated GIF
    Gif {
        /// Source file whose text is replayed as the animation
        input: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = "recording.gif")]
        output: PathBuf,

        /// Animation frame rate
        #[arg(long, default_value = "10")]
        fps: u32,

        /// Output width in logical pixels (defaults to saved settings)
        #[arg(long)]
        width: Option<u32>,

        /// Output height in logical pixels (defaults to saved settings)
        #[arg(long)]
        height: Option<u32>,

        /// Per-character delay in milliseconds (defaults to saved settings)
        #[arg(long)]
        typing_speed_ms: Option<u64>,
    },

    /// Check host capabilities
    Check,

    /// Show or initialize persisted settings
    Settings {
        /// Write default settings to the standard location
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    codereel_common::logging::init_logging(&codereel_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Record {
            input,
            output,
            fps,
            width,
            height,
            typing_speed_ms,
        } => commands::record::run(input, output, fps, width, height, typing_speed_ms).await,
        Commands::Gif {
            input,
            output,
            fps,
            width,
            height,
            typing_speed_ms,
        } => commands::gif::run(input, output, fps, width, height, typing_speed_ms).await,
        Commands::Check => commands::check::run(),
        Commands::Settings { init } => commands::settings::run(init),
    }
}
