//! ASCII rendering for terminal review.
//!
//! Grids use the default map glyphs (`S`, `G`, `T`, `#`, `.`, `%`, `~`), so
//! a rendered grid can be pasted straight back into a layout-form map.

use std::fmt::Write as _;

use maze_core::grid::{CellRole, Coord, Direction, Grid, Path};
use maze_core::movement::{MovementOutcome, RunSummary, StepRecord};
use maze_core::pathfinding::DistanceMap;

/// Glyph for the robot when a position overlay is requested.
pub const ROBOT_GLYPH: char = '@';

/// What to draw on top of the grid.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions<'a> {
    /// Route to overlay, walked from the start cell.
    pub path: Option<&'a Path>,
    /// Robot position to mark.
    pub robot: Option<Coord>,
    /// Append a glyph legend.
    pub legend: bool,
}

/// Arrow for a route leaving a cell in `direction`.
const fn arrow(direction: Direction) -> char {
    match direction {
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    }
}

/// Render the grid, one text line per row.
///
/// Route arrows are drawn on plain cells only; start, goal and hazards keep
/// their glyphs so the route never hides what it passes.
#[must_use]
pub fn render_grid(grid: &Grid, options: &RenderOptions<'_>) -> String {
    let width = grid.width() as usize;
    let mut glyphs: Vec<char> = grid.cells().map(|(_, role)| role.glyph()).collect();

    if let Some(path) = options.path {
        let mut current = grid.start();
        for &direction in path {
            if let Some(index) = grid.index(current) {
                if grid.role(current) == Some(CellRole::Normal) {
                    glyphs[index] = arrow(direction);
                }
            }
            match grid.neighbor(current, direction) {
                Some(next) => current = next,
                None => break,
            }
        }
    }
    if let Some(index) = options.robot.and_then(|robot| grid.index(robot)) {
        glyphs[index] = ROBOT_GLYPH;
    }

    let mut out = String::with_capacity(glyphs.len() + grid.height() as usize);
    for row in glyphs.chunks(width.max(1)) {
        out.extend(row);
        out.push('\n');
    }
    if options.legend {
        out.push_str("S start  G goal  T trap  # wall  . floor  % blocked  ~ decor");
        if options.path.is_some() {
            out.push_str("  ^v<> route");
        }
        if options.robot.is_some() {
            let _ = write!(out, "  {ROBOT_GLYPH} robot");
        }
        out.push('\n');
    }
    out
}

/// Render a distance field as a table of move counts.
///
/// Blocking cells show `#`, traps `T`, unreachable floor `-`.
#[must_use]
pub fn render_distances(grid: &Grid, field: &DistanceMap) -> String {
    let column = field.max_distance().unwrap_or(0).to_string().len().max(1);
    let mut out = String::new();

    for y in 0..grid.height() {
        let cells: Vec<String> = (0..grid.width())
            .map(|x| {
                let coord = Coord::new(x, y);
                let text = match (field.distance(coord), grid.role(coord)) {
                    (Some(d), _) => d.to_string(),
                    (None, Some(role)) if role.blocks_movement() => "#".to_string(),
                    (None, Some(CellRole::Trap)) => "T".to_string(),
                    _ => "-".to_string(),
                };
                format!("{text:>column$}")
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

fn outcome_label(outcome: MovementOutcome) -> &'static str {
    match outcome {
        MovementOutcome::Moved => "moved",
        MovementOutcome::BlockedByBounds => "blocked by edge",
        MovementOutcome::BlockedByObstacle => "blocked by obstacle",
        MovementOutcome::ReachedGoal => "reached goal",
        MovementOutcome::TriggeredTrap => "triggered trap",
    }
}

/// One numbered line per executed step.
#[must_use]
pub fn format_records(records: &[StepRecord]) -> String {
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<5} {} -> {}  {}",
            i + 1,
            record.direction.name(),
            record.from,
            record.to,
            outcome_label(record.outcome)
        );
    }
    out
}

/// Single-line run summary.
#[must_use]
pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "{:?} at {} after {} steps ({} moves, {} blocked)",
        summary.status, summary.final_position, summary.executed, summary.moves, summary.blocked
    )
}
