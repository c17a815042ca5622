//! Navigation sessions.
//!
//! A [`Session`] owns one grid and the robot position for a single attempt
//! at a map. It refuses further moves once the run is over until it is
//! reset, and keeps the executed history so a presentation layer can
//! animate or replay it.

use crate::error::{MazeError, Result};
use crate::grid::{Coord, Direction, Grid};
use crate::movement::{self, RunStatus, RunSummary, StepRecord};

/// One robot on one map.
#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid,
    position: Coord,
    status: RunStatus,
    history: Vec<StepRecord>,
}

impl Session {
    /// Start a session at the grid's start cell.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        let position = grid.start();
        Self {
            grid,
            position,
            status: RunStatus::InProgress,
            history: Vec::new(),
        }
    }

    /// The map being navigated.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current robot position.
    #[must_use]
    pub const fn position(&self) -> Coord {
        self.position
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Every step executed since the last reset.
    #[must_use]
    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    /// Summary of the history.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        movement::summarize(self.grid.start(), &self.history)
    }

    /// Apply a single move.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::SessionOver`] once a goal or trap was reached.
    pub fn step(&mut self, direction: Direction) -> Result<StepRecord> {
        if self.status.is_finished() {
            return Err(MazeError::SessionOver);
        }
        let record = movement::step(&self.grid, self.position, direction);
        self.apply(record);
        Ok(record)
    }

    /// Apply a sequence of moves, stopping at the first terminal outcome.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::SessionOver`] if the session was already over
    /// before the first move.
    pub fn run<P>(&mut self, path: &P) -> Result<Vec<StepRecord>>
    where
        P: AsRef<[Direction]> + ?Sized,
    {
        if self.status.is_finished() {
            return Err(MazeError::SessionOver);
        }
        let mut position = self.position;
        let records = movement::run(&self.grid, &mut position, path);
        for &record in &records {
            self.apply(record);
        }
        Ok(records)
    }

    /// Return to the start cell and clear the history.
    pub fn reset(&mut self) {
        self.position = self.grid.start();
        self.status = RunStatus::InProgress;
        self.history.clear();
        tracing::trace!(position = %self.position, "Session reset");
    }

    fn apply(&mut self, record: StepRecord) {
        self.position = record.to;
        self.status = RunStatus::from_outcome(record.outcome);
        self.history.push(record);
        if self.status.is_finished() {
            tracing::debug!(
                status = ?self.status,
                position = %self.position,
                steps = self.history.len(),
                "Session finished"
            );
        }
    }
}
