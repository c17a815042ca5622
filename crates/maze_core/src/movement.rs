//! Step-by-step movement execution.
//!
//! A single step applies one direction to a position and classifies the
//! result. Bounds and obstacle checks happen before the move is committed,
//! so a blocked step leaves the position untouched and can be retried
//! safely. Trap and goal checks happen after the commit: the robot is on the
//! trap or goal cell when the caller learns the run is over.
//!
//! The executor does not care where commands come from. Planned paths and
//! oracle output go through the same [`run`].

use serde::{Deserialize, Serialize};

use crate::grid::{CellRole, Coord, Direction, Grid};

/// Result of attempting one directional step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementOutcome {
    /// Moved onto an ordinary cell; the run continues.
    Moved,
    /// Target is outside the grid; position unchanged.
    BlockedByBounds,
    /// Target cell is impassable; position unchanged.
    BlockedByObstacle,
    /// Moved onto a goal cell. Terminal.
    ReachedGoal,
    /// Moved onto a trap cell. Terminal.
    TriggeredTrap,
}

impl MovementOutcome {
    /// True if the run must stop after this step.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::ReachedGoal | Self::TriggeredTrap)
    }

    /// True if the step was refused and the position did not change.
    #[must_use]
    pub const fn is_blocked(self) -> bool {
        matches!(self, Self::BlockedByBounds | Self::BlockedByObstacle)
    }
}

/// One executed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepRecord {
    /// Command that was applied.
    pub direction: Direction,
    /// Position before the step.
    pub from: Coord,
    /// Position after the step; equals `from` when blocked.
    pub to: Coord,
    /// Classification of the step.
    pub outcome: MovementOutcome,
}

/// Apply one direction to `position`.
///
/// Pure: the same inputs always give the same record, and every input maps
/// to exactly one outcome.
#[must_use]
pub fn step(grid: &Grid, position: Coord, direction: Direction) -> StepRecord {
    let blocked = |outcome: MovementOutcome| StepRecord {
        direction,
        from: position,
        to: position,
        outcome,
    };

    let Some(target) = grid.neighbor(position, direction) else {
        return blocked(MovementOutcome::BlockedByBounds);
    };
    let Some(role) = grid.role(target) else {
        return blocked(MovementOutcome::BlockedByBounds);
    };
    if role.blocks_movement() {
        return blocked(MovementOutcome::BlockedByObstacle);
    }

    let outcome = match role {
        CellRole::Trap => MovementOutcome::TriggeredTrap,
        CellRole::Goal => MovementOutcome::ReachedGoal,
        _ => MovementOutcome::Moved,
    };
    StepRecord {
        direction,
        from: position,
        to: target,
        outcome,
    }
}

/// Execute `path` from `position`, updating it in place.
///
/// Blocked steps are recorded and skipped. Execution stops right after the
/// first terminal outcome; later commands are never applied.
pub fn run<P>(grid: &Grid, position: &mut Coord, path: &P) -> Vec<StepRecord>
where
    P: AsRef<[Direction]> + ?Sized,
{
    let commands = path.as_ref();
    let mut records = Vec::with_capacity(commands.len());

    for &direction in commands {
        let record = step(grid, *position, direction);
        *position = record.to;
        records.push(record);

        if record.outcome.is_terminal() {
            tracing::debug!(
                position = %record.to,
                outcome = ?record.outcome,
                executed = records.len(),
                skipped = commands.len() - records.len(),
                "Run reached a terminal outcome"
            );
            break;
        }
    }

    records
}

/// Overall state of a run or session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No terminal outcome yet.
    #[default]
    InProgress,
    /// Reached a goal.
    Won,
    /// Triggered a trap.
    Lost,
}

impl RunStatus {
    /// Status implied by the last outcome of a run.
    #[must_use]
    pub const fn from_outcome(outcome: MovementOutcome) -> Self {
        match outcome {
            MovementOutcome::ReachedGoal => Self::Won,
            MovementOutcome::TriggeredTrap => Self::Lost,
            _ => Self::InProgress,
        }
    }

    /// True once the run is over.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Aggregate view over a sequence of step records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Steps applied, blocked ones included.
    pub executed: usize,
    /// Steps that changed the position.
    pub moves: usize,
    /// Steps refused by bounds or obstacles.
    pub blocked: usize,
    /// Final status.
    pub status: RunStatus,
    /// Position after the last step.
    pub final_position: Coord,
}

/// Summarize the records of a run that started at `start`.
#[must_use]
pub fn summarize(start: Coord, records: &[StepRecord]) -> RunSummary {
    let blocked = records.iter().filter(|r| r.outcome.is_blocked()).count();
    RunSummary {
        executed: records.len(),
        moves: records.len() - blocked,
        blocked,
        status: records
            .last()
            .map_or(RunStatus::InProgress, |r| RunStatus::from_outcome(r.outcome)),
        final_position: records.last().map_or(start, |r| r.to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridBuilder;
    use Direction::{Down, Left, Right, Up};

    /// ```text
    /// S . G .
    /// . # T .
    /// ```
    fn test_grid() -> Grid {
        Grid::from_ascii(&["S.G.", ".#T."]).unwrap()
    }

    #[test]
    fn test_step_moved() {
        let grid = test_grid();
        let record = step(&grid, Coord::new(0, 0), Right);
        assert_eq!(record.to, Coord::new(1, 0));
        assert_eq!(record.outcome, MovementOutcome::Moved);
        assert!(!record.outcome.is_terminal());
    }

    #[test]
    fn test_step_blocked_by_bounds_is_idempotent() {
        let grid = test_grid();
        let first = step(&grid, Coord::new(0, 0), Up);
        let second = step(&grid, first.to, Up);
        assert_eq!(first.outcome, MovementOutcome::BlockedByBounds);
        assert_eq!(first.to, Coord::new(0, 0));
        assert_eq!(first, second);

        let right_edge = step(&grid, Coord::new(3, 1), Right);
        assert_eq!(right_edge.outcome, MovementOutcome::BlockedByBounds);
        assert_eq!(right_edge.to, Coord::new(3, 1));
    }

    #[test]
    fn test_step_blocked_by_obstacle() {
        let grid = test_grid();
        let record = step(&grid, Coord::new(0, 1), Right);
        assert_eq!(record.outcome, MovementOutcome::BlockedByObstacle);
        assert_eq!(record.to, Coord::new(0, 1));
        assert!(record.outcome.is_blocked());
    }

    #[test]
    fn test_blocking_custom_role_acts_as_obstacle() {
        let grid = Grid::from_ascii(&["S%G"]).unwrap();
        let record = step(&grid, grid.start(), Right);
        assert_eq!(record.outcome, MovementOutcome::BlockedByObstacle);

        let walkable = Grid::from_ascii(&["S~G"]).unwrap();
        let record = step(&walkable, walkable.start(), Right);
        assert_eq!(record.outcome, MovementOutcome::Moved);
    }

    #[test]
    fn test_step_onto_trap_commits_position() {
        let grid = test_grid();
        let record = step(&grid, Coord::new(2, 0), Down);
        assert_eq!(record.outcome, MovementOutcome::TriggeredTrap);
        assert_eq!(record.to, Coord::new(2, 1));
    }

    #[test]
    fn test_step_onto_goal_commits_position() {
        let grid = test_grid();
        let record = step(&grid, Coord::new(1, 0), Right);
        assert_eq!(record.outcome, MovementOutcome::ReachedGoal);
        assert_eq!(record.to, Coord::new(2, 0));
    }

    #[test]
    fn test_run_halts_at_goal() {
        let grid = test_grid();
        let mut position = grid.start();
        let records = run(&grid, &mut position, &[Right, Right, Right]);
        let outcomes: Vec<_> = records.iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![MovementOutcome::Moved, MovementOutcome::ReachedGoal]
        );
        assert_eq!(position, Coord::new(2, 0));
    }

    #[test]
    fn test_run_skips_blocked_until_goal() {
        let grid = test_grid();
        let mut position = grid.start();
        let records = run(&grid, &mut position, &[Down, Right, Up, Right, Down, Right]);
        // D to (0,1), R blocked, U back to (0,0), R to (1,0), D blocked, R goal.
        assert_eq!(records.len(), 6);
        assert_eq!(records[1].outcome, MovementOutcome::BlockedByObstacle);
        assert_eq!(records[4].outcome, MovementOutcome::BlockedByObstacle);
        assert_eq!(records[5].outcome, MovementOutcome::ReachedGoal);
    }

    #[test]
    fn test_run_halts_at_trap() {
        let grid = test_grid();
        let mut position = Coord::new(3, 0);
        let records = run(&grid, &mut position, &[Down, Left, Left, Left]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].outcome, MovementOutcome::TriggeredTrap);
        assert_eq!(position, Coord::new(2, 1));
    }

    #[test]
    fn test_run_continues_past_blocked_steps() {
        let grid = GridBuilder::new(3, 1)
            .with_start(0, 0)
            .with_goal(2, 0)
            .build()
            .unwrap();
        let mut position = grid.start();
        let records = run(&grid, &mut position, &[Left, Up, Right, Right]);
        let outcomes: Vec<_> = records.iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                MovementOutcome::BlockedByBounds,
                MovementOutcome::BlockedByBounds,
                MovementOutcome::Moved,
                MovementOutcome::ReachedGoal,
            ]
        );
    }

    #[test]
    fn test_run_empty_path() {
        let grid = test_grid();
        let mut position = grid.start();
        let records = run(&grid, &mut position, &[] as &[Direction]);
        assert!(records.is_empty());
        assert_eq!(position, grid.start());
    }

    #[test]
    fn test_summarize() {
        let grid = test_grid();
        let start = grid.start();
        let mut position = start;
        let records = run(&grid, &mut position, &[Up, Right, Right]);
        let summary = summarize(start, &records);
        assert_eq!(summary.executed, 3);
        assert_eq!(summary.moves, 2);
        assert_eq!(summary.blocked, 1);
        assert_eq!(summary.status, RunStatus::Won);
        assert_eq!(summary.final_position, Coord::new(2, 0));

        let empty = summarize(start, &[]);
        assert_eq!(empty.status, RunStatus::InProgress);
        assert_eq!(empty.final_position, start);
    }
}
