//! # Maze Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Fixture grids and maps
//! - Reference shortest-distance search
//! - Determinism test harness
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod reference;

/// Re-export proptest for convenience.
pub use proptest;
