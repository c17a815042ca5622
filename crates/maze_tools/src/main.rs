//! Robot Maze - Development Tools
//!
//! # Usage
//!
//! ```bash
//! # Check every map in a directory
//! cargo run -p maze_tools -- validate assets/maps
//!
//! # Plan a route and print the distance field
//! cargo run -p maze_tools -- solve assets/maps/classroom.ron --distances
//!
//! # Execute oracle output and record it
//! cargo run -p maze_tools -- run assets/maps/classroom.ron --commands "DDRRR" --record run.replay
//!
//! # Verify and print a recording
//! cargo run -p maze_tools -- replay run.replay
//! ```

use std::path::{Path as FsPath, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maze_core::prelude::*;
use maze_tools::render::{
    format_records, format_summary, render_distances, render_grid, RenderOptions,
};
use maze_tools::validate::{load_grid, validate_path};

#[derive(Parser)]
#[command(name = "maze-tools")]
#[command(about = "Development tools for Robot Maze")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a map file or every map in a directory
    Validate {
        /// Map file or directory
        #[arg(default_value = "assets/maps")]
        path: PathBuf,
    },

    /// Find the shortest safe route from start to goal
    Solve {
        /// Map file
        map: PathBuf,
        /// Also print the distance from the start to every cell
        #[arg(long)]
        distances: bool,
    },

    /// Validate and execute a command string
    Run {
        /// Map file
        map: PathBuf,
        /// Command text, e.g. "RRDD" or "right, right, down"
        #[arg(short, long)]
        commands: String,
        /// Reject the input instead of dropping non-direction characters
        #[arg(long)]
        strict: bool,
        /// Write a replay file of the run
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Print the map as ASCII
    Render {
        /// Map file
        map: PathBuf,
        /// Overlay the shortest safe route
        #[arg(long)]
        path: bool,
    },

    /// Verify a replay file and print its steps
    Replay {
        /// Replay file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(log_level).into())
                .from_env_lossy(),
        )
        .init();

    let result = match cli.command {
        Commands::Validate { path } => cmd_validate(&path),
        Commands::Solve { map, distances } => cmd_solve(&map, distances),
        Commands::Run {
            map,
            commands,
            strict,
            record,
        } => cmd_run(&map, &commands, strict, record.as_deref()),
        Commands::Render { map, path } => cmd_render(&map, path),
        Commands::Replay { file } => cmd_replay(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

type CmdResult = std::result::Result<(), Box<dyn std::error::Error>>;

fn cmd_validate(path: &FsPath) -> CmdResult {
    tracing::info!("Validating maps in: {}", path.display());
    let reports = validate_path(path)?;
    for report in &reports {
        println!("{report}");
    }
    tracing::info!("Validation passed for {} map(s)", reports.len());
    Ok(())
}

fn cmd_solve(map: &FsPath, distances: bool) -> CmdResult {
    let (_, grid) = load_grid(map)?;
    match find_route(&grid)? {
        Some(path) => {
            println!("{} moves: {path}", path.len());
            print!(
                "{}",
                render_grid(
                    &grid,
                    &RenderOptions {
                        path: Some(&path),
                        ..RenderOptions::default()
                    }
                )
            );
        }
        None => println!("No safe route from {} to {}", grid.start(), grid.goal()),
    }
    if distances {
        let field = distance_map(&grid, grid.start())?;
        println!();
        print!("{}", render_distances(&grid, &field));
    }
    Ok(())
}

fn cmd_run(map: &FsPath, commands: &str, strict: bool, record: Option<&FsPath>) -> CmdResult {
    let (description, grid) = load_grid(map)?;
    let policy = if strict {
        CommandPolicy::Strict
    } else {
        CommandPolicy::Strip
    };
    let path = parse_commands(commands, policy)?;

    let mut session = Session::new(grid);
    let records = session.run(&path)?;

    print!("{}", format_records(&records));
    println!("{}", format_summary(&session.summary()));
    if records.len() < path.len() {
        println!("{} command(s) not executed", path.len() - records.len());
    }

    if let Some(out) = record {
        Replay::from_session(description.name, &session).save(out)?;
        tracing::info!("Replay written to {}", out.display());
    }
    Ok(())
}

fn cmd_render(map: &FsPath, with_path: bool) -> CmdResult {
    let (_, grid) = load_grid(map)?;
    let route = if with_path { find_route(&grid)? } else { None };
    print!(
        "{}",
        render_grid(
            &grid,
            &RenderOptions {
                path: route.as_ref(),
                robot: None,
                legend: true,
            }
        )
    );
    Ok(())
}

fn cmd_replay(file: &FsPath) -> CmdResult {
    let replay = Replay::load(file)?;
    replay.verify()?;

    let mut player = ReplayPlayer::new(replay);
    let mut records = Vec::new();
    while let Some(record) = player.advance() {
        records.push(record);
    }
    let replay = player.replay();

    println!("{} ({} steps)", replay.map_name, replay.len());
    print!("{}", format_records(&records));
    println!("{}", format_summary(&summarize(replay.start, &records)));
    print!(
        "{}",
        render_grid(
            &replay.grid,
            &RenderOptions {
                robot: Some(player.position()),
                ..RenderOptions::default()
            }
        )
    );
    Ok(())
}
