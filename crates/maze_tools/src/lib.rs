//! # Maze Development Tools
//!
//! Command-line tools for map authors and instructors:
//! - Map validators
//! - ASCII rendering of grids, routes and distance fields
//! - Run and replay reports

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod render;
pub mod validate;
