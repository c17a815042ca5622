//! # Maze Core
//!
//! Deterministic navigation core for the robot maze exercise.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No stdout or user-facing notification
//! - No randomness
//! - No timing; pacing between steps belongs to the presentation layer
//!
//! The same map and the same commands always produce the same outcomes,
//! which keeps tests, replays and animations in agreement.
//!
//! ## Crate Structure
//!
//! - [`grid`] - Coordinates, directions, paths, cell roles and the grid
//! - [`map`] - Map descriptions (layout or record form) and normalization
//! - [`pathfinding`] - Breadth-first shortest-path search
//! - [`movement`] - Single-step and multi-step movement execution
//! - [`commands`] - Validation of oracle-supplied command text
//! - [`session`] - One robot on one map, with history and reset
//! - [`replay`] - Recording, persisting and verifying runs

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod commands;
pub mod error;
pub mod grid;
pub mod map;
pub mod movement;
pub mod pathfinding;
pub mod replay;
pub mod session;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commands::{parse_commands, CommandPolicy};
    pub use crate::error::{MazeError, Result};
    pub use crate::grid::{CellRole, Coord, Direction, Grid, GridBuilder, Path};
    pub use crate::map::{MapDescription, MapLayout};
    pub use crate::movement::{
        run, step, summarize, MovementOutcome, RunStatus, RunSummary, StepRecord,
    };
    pub use crate::pathfinding::{distance_map, find_path, find_route, DistanceMap};
    pub use crate::replay::{Replay, ReplayPlayer};
    pub use crate::session::Session;
}
