//! Headless maze runner for presentation layers and oracle bridges.
//!
//! This crate provides a runner that can be controlled via JSON commands
//! on stdin, with responses on stdout. This enables:
//!
//! - **Presentation layers**: A GUI or web front end animates the steps it
//!   receives without reimplementing any navigation rules
//! - **Oracle bridges**: Text from a completion service is passed through
//!   as a `run` command and validated by the core
//! - **CI verification**: Scripted sessions check outcomes end to end
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: Commands from controller (load_map, step, run, etc.)
//! - **stdout**: Responses (JSON)
//! - **stderr**: Debug logs (human-readable)
//!
//! See [`protocol`] module for the full command/response reference.
//!
//! # Example
//!
//! ```bash
//! echo '{"cmd":"autoplay"}' | cargo run -p maze_headless -- --preset classroom
//! ```

#![forbid(unsafe_code)]

pub mod protocol;
pub mod runner;

pub use protocol::{Command, Response};
pub use runner::{HeadlessConfig, HeadlessError, HeadlessRunner};
