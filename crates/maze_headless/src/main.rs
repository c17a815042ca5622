//! Headless maze runner.
//!
//! This binary runs navigation sessions without graphics, controlled via
//! JSON on stdin/stdout.
//!
//! # Usage
//!
//! ```bash
//! # Start empty and load a map from the controller
//! cargo run -p maze_headless
//!
//! # Start on a map file, reporting state after every move
//! cargo run -p maze_headless -- --map assets/maps/garden.ron --auto-state
//!
//! # Reject noisy oracle output instead of stripping it
//! cargo run -p maze_headless -- --preset classroom --strict
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON commands, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maze_core::commands::CommandPolicy;
use maze_headless::runner::{HeadlessConfig, HeadlessRunner};

#[derive(Parser)]
#[command(name = "maze_headless")]
#[command(about = "Headless robot maze runner driven by JSON lines")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Map file to load on startup
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Built-in map to load on startup (classroom, open)
    #[arg(short, long, conflicts_with = "map")]
    preset: Option<String>,

    /// Reject oracle text containing non-direction characters
    #[arg(long)]
    strict: bool,

    /// Output state after every move
    #[arg(long)]
    auto_state: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(true),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(log_level).into())
                .from_env_lossy(),
        )
        .init();

    let config = HeadlessConfig {
        map_path: cli.map,
        preset: cli.preset,
        policy: if cli.strict {
            CommandPolicy::Strict
        } else {
            CommandPolicy::Strip
        },
        auto_state_output: cli.auto_state,
    };

    let result = HeadlessRunner::with_config(config)
        .and_then(|mut runner| runner.run(io::stdin().lock(), io::stdout().lock()));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
