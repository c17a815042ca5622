//! Determinism testing utilities.
//!
//! Provides a harness for verifying that planning and execution produce
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Replays, animations and tests all assume that the same map and the same
//! commands give the same outcome sequence. Sources of non-determinism to
//! watch for:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   The core only iterates `Vec`s and fixed direction arrays.
//!
//! - **Shared mutable state**: Grids are immutable after construction, so
//!   concurrent runs on one grid must agree.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual operations (`find_path`, `step`, `run`)
//! 2. **Property tests**: Random grids and command streams
//! 3. **Parallel tests**: Running N navigations on one grid all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use maze_core::grid::{Grid, Path};
use maze_core::movement;
use maze_core::pathfinding::find_path;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps applied per run.
    pub steps: u64,
}

impl DeterminismResult {
    fn from_hashes(hashes: Vec<u64>, steps: u64) -> Self {
        let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
        if !is_deterministic {
            tracing::debug!(runs = hashes.len(), steps, "Runs diverged");
        }
        Self {
            is_deterministic,
            hashes,
            steps,
        }
    }

    /// Get all unique hashes (should be 1 for a deterministic run).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Navigation is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a stateful process multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to repeat the process
/// * `steps` - Number of steps to apply per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute the state hash
///
/// # Example
///
/// ```ignore
/// use maze_core::prelude::*;
/// use maze_test_utils::determinism::{compute_hash, verify_determinism};
///
/// let result = verify_determinism(
///     5,
///     10,
///     || Session::new(fixtures::classroom()),
///     |session| { let _ = session.step(Direction::Right); },
///     |session| compute_hash(&session.history()),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..steps {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    DeterminismResult::from_hashes(hashes, steps)
}

/// Hash of everything observable about planning and executing on `grid`:
/// the planned path (or its absence) and the records of running `commands`.
#[must_use]
pub fn navigation_hash(grid: &Grid, commands: &Path) -> u64 {
    let planned = find_path(grid, grid.start(), grid.goal()).ok().flatten();
    let mut position = grid.start();
    let records = movement::run(grid, &mut position, commands);
    compute_hash(&(planned, records, position))
}

/// Plan and execute on the same grid `runs` times and compare results.
#[must_use]
pub fn verify_navigation_determinism(grid: &Grid, commands: &Path, runs: usize) -> DeterminismResult {
    let hashes = (0..runs).map(|_| navigation_hash(grid, commands)).collect();
    DeterminismResult::from_hashes(hashes, commands.len() as u64)
}

/// Run N navigations on one shared grid from scoped threads.
///
/// The grid is only borrowed; every thread reads the same instance.
///
/// # Panics
///
/// Panics if a worker thread panics.
#[must_use]
pub fn run_parallel_navigations(grid: &Grid, commands: &Path, threads: usize) -> DeterminismResult {
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| s.spawn(|| navigation_hash(grid, commands)))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("navigation thread panicked"))
            .collect()
    });

    DeterminismResult::from_hashes(hashes, commands.len() as u64)
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for navigation testing.
///
/// These strategies generate random but reproducible grids and command
/// streams for property-based testing.
pub mod strategies {
    use maze_core::grid::{CellRole, Coord, Direction, Grid, GridBuilder, Path};
    use proptest::prelude::*;

    /// Generate a single direction.
    pub fn arb_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    /// Generate a command sequence of up to `max_len` moves.
    pub fn arb_commands(max_len: usize) -> impl Strategy<Value = Path> {
        proptest::collection::vec(arb_direction(), 0..max_len).prop_map(Path::from)
    }

    /// Generate a filler role. Mostly floor, with some hazards.
    pub fn arb_filler_role() -> impl Strategy<Value = CellRole> {
        prop_oneof![
            6 => Just(CellRole::Normal),
            2 => Just(CellRole::Obstacle),
            1 => Just(CellRole::Trap),
            1 => any::<bool>().prop_map(|blocking| CellRole::Custom { blocking }),
        ]
    }

    /// Generate a valid grid up to `max_width` x `max_height` with distinct
    /// start and goal cells.
    ///
    /// Grids are not guaranteed to be solvable.
    pub fn arb_grid(max_width: u32, max_height: u32) -> impl Strategy<Value = Grid> {
        (2..=max_width.max(2), 1..=max_height.max(1))
            .prop_flat_map(|(width, height)| {
                let area = (width * height) as usize;
                (
                    Just(width),
                    Just(height),
                    proptest::collection::vec(arb_filler_role(), area),
                    0..area,
                    1..area,
                )
            })
            .prop_map(|(width, height, fillers, start, goal_offset)| {
                let area = fillers.len();
                let goal = (start + goal_offset) % area;
                let mut builder = GridBuilder::new(width, height);
                for (index, role) in fillers.into_iter().enumerate() {
                    builder.set_role(to_coord(width, index), role);
                }
                builder.set_role(to_coord(width, start), CellRole::Start);
                builder.set_role(to_coord(width, goal), CellRole::Goal);
                builder.build().expect("start and goal are distinct")
            })
    }

    /// Generate a grid together with a command sequence.
    pub fn arb_grid_and_commands(
        max_side: u32,
        max_len: usize,
    ) -> impl Strategy<Value = (Grid, Path)> {
        (arb_grid(max_side, max_side), arb_commands(max_len))
    }

    fn to_coord(width: u32, index: usize) -> Coord {
        let index = index as u32;
        Coord::new(index % width, index / width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use maze_core::grid::Direction;
    use proptest::prelude::*;

    #[test]
    fn test_determinism_harness_counts() {
        let result = verify_determinism(3, 5, || 0u64, |n| *n += 2, |n| *n);
        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![10, 10, 10]);
        assert_eq!(result.unique_hashes(), vec![10]);
    }

    #[test]
    #[should_panic(expected = "non-deterministic")]
    fn test_divergence_is_reported() {
        let counter = std::cell::Cell::new(0u64);
        let result = verify_determinism(
            2,
            1,
            || {
                counter.set(counter.get() + 1);
                counter.get()
            },
            |_| {},
            |n| *n,
        );
        result.assert_deterministic();
    }

    #[test]
    fn test_classroom_navigation_is_deterministic() {
        let grid = fixtures::classroom();
        let commands = Path::from(vec![Direction::Right; 6]);
        verify_navigation_determinism(&grid, &commands, 5).assert_deterministic();
        run_parallel_navigations(&grid, &commands, 4).assert_deterministic();
    }

    proptest! {
        #[test]
        fn prop_generated_grids_are_valid(grid in strategies::arb_grid(6, 6)) {
            prop_assert!(grid.in_bounds(grid.start()));
            prop_assert!(grid.in_bounds(grid.goal()));
            prop_assert_ne!(grid.start(), grid.goal());
        }
    }
}
