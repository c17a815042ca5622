//! Replay system for recording and playing back navigation runs.
//!
//! A replay stores the grid, the start position and the command stream that
//! was executed, together with the outcomes observed at record time.
//! Execution is deterministic, so re-running the commands must reproduce
//! the recorded outcomes exactly.

use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Result};
use crate::grid::{Coord, Grid, Path};
use crate::movement::{self, MovementOutcome, RunStatus, StepRecord};
use crate::session::Session;

/// Replay file format version for compatibility.
pub const REPLAY_VERSION: u32 = 1;

/// Complete replay data structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    /// Replay format version.
    pub version: u32,
    /// Name of the map that was played.
    pub map_name: String,
    /// The map itself.
    pub grid: Grid,
    /// Position before the first command.
    pub start: Coord,
    /// Commands in execution order.
    pub commands: Path,
    /// Outcome of each command at record time.
    pub outcomes: Vec<MovementOutcome>,
    /// Position after the last command.
    pub final_position: Coord,
}

impl Replay {
    /// Record a replay by executing `commands` from `start`.
    ///
    /// Only the commands that were actually executed are kept; anything
    /// after a terminal outcome is dropped.
    #[must_use]
    pub fn record(map_name: impl Into<String>, grid: Grid, start: Coord, commands: &Path) -> Self {
        let mut position = start;
        let records = movement::run(&grid, &mut position, commands);
        Self::from_records(map_name, grid, start, &records, position)
    }

    /// Capture the history of a session.
    #[must_use]
    pub fn from_session(map_name: impl Into<String>, session: &Session) -> Self {
        Self::from_records(
            map_name,
            session.grid().clone(),
            session.grid().start(),
            session.history(),
            session.position(),
        )
    }

    fn from_records(
        map_name: impl Into<String>,
        grid: Grid,
        start: Coord,
        records: &[StepRecord],
        final_position: Coord,
    ) -> Self {
        Self {
            version: REPLAY_VERSION,
            map_name: map_name.into(),
            grid,
            start,
            commands: records.iter().map(|r| r.direction).collect(),
            outcomes: records.iter().map(|r| r.outcome).collect(),
            final_position,
        }
    }

    /// Final status implied by the recorded outcomes.
    #[must_use]
    pub fn status(&self) -> RunStatus {
        self.outcomes
            .last()
            .map_or(RunStatus::InProgress, |&o| RunStatus::from_outcome(o))
    }

    /// Number of recorded steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Save the replay to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<FsPath>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes =
            bincode::serialize(self).map_err(|e| MazeError::parse(path.display().to_string(), e))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a replay from a file.
    ///
    /// # Errors
    /// Returns an error if file reading or deserialization fails, or the
    /// version does not match [`REPLAY_VERSION`].
    pub fn load<P: AsRef<FsPath>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let replay: Self = bincode::deserialize(&bytes)
            .map_err(|e| MazeError::parse(path.display().to_string(), e))?;

        if replay.version != REPLAY_VERSION {
            return Err(MazeError::parse(
                path.display().to_string(),
                format!(
                    "replay version mismatch: expected {REPLAY_VERSION}, got {}",
                    replay.version
                ),
            ));
        }

        Ok(replay)
    }

    /// Re-run the commands and check they reproduce the recording.
    ///
    /// # Errors
    /// Returns [`MazeError::ReplayMismatch`] at the first diverging step.
    pub fn verify(&self) -> Result<()> {
        let mut position = self.start;
        let records = movement::run(&self.grid, &mut position, &self.commands);

        for (index, expected) in self.outcomes.iter().enumerate() {
            match records.get(index) {
                Some(record) if record.outcome == *expected => {}
                _ => return Err(MazeError::ReplayMismatch { index }),
            }
        }
        if records.len() != self.outcomes.len() {
            return Err(MazeError::ReplayMismatch {
                index: self.outcomes.len(),
            });
        }
        if position != self.final_position {
            return Err(MazeError::ReplayMismatch {
                index: records.len(),
            });
        }
        Ok(())
    }
}

/// Replay playback controller, one step per call.
#[derive(Debug)]
pub struct ReplayPlayer {
    replay: Replay,
    position: Coord,
    cursor: usize,
}

impl ReplayPlayer {
    /// Create a player positioned before the first step.
    #[must_use]
    pub fn new(replay: Replay) -> Self {
        let position = replay.start;
        Self {
            replay,
            position,
            cursor: 0,
        }
    }

    /// Execute the next recorded command.
    ///
    /// Returns `None` once every command has been played.
    pub fn advance(&mut self) -> Option<StepRecord> {
        let &direction = self.replay.commands.as_slice().get(self.cursor)?;
        let record = movement::step(&self.replay.grid, self.position, direction);
        self.position = record.to;
        self.cursor += 1;
        Some(record)
    }

    /// Jump to just after step `target` (clamped to the replay length).
    pub fn seek(&mut self, target: usize) {
        self.position = self.replay.start;
        self.cursor = 0;
        while self.cursor < target && self.advance().is_some() {}
    }

    /// Current robot position.
    #[must_use]
    pub const fn position(&self) -> Coord {
        self.position
    }

    /// Number of steps played so far.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// The replay being played.
    #[must_use]
    pub const fn replay(&self) -> &Replay {
        &self.replay
    }

    /// Check if every step has been played.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.replay.len()
    }

    /// Get progress as a percentage (0-100).
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.replay.is_empty() {
            100.0
        } else {
            (self.cursor as f64 / self.replay.len() as f64) * 100.0
        }
    }
}
