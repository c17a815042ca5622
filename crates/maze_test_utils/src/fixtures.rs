//! Test fixtures and helpers.
//!
//! Pre-built grids and maps for consistent testing. Every fixture is a valid
//! grid, so the constructors panic instead of returning errors.

use maze_core::grid::{CellRole, Coord, Grid, GridBuilder};
use maze_core::map::MapDescription;

/// Obstacle-free grid, start at `(0, 0)`, goal at the opposite corner.
///
/// # Panics
///
/// Panics if the grid has fewer than two cells.
#[must_use]
pub fn open_grid(width: u32, height: u32) -> Grid {
    GridBuilder::new(width, height)
        .with_start(0, 0)
        .with_goal(width - 1, height - 1)
        .build()
        .expect("open grid fixture is valid")
}

/// Grid split by a solid obstacle column; start and goal on opposite sides.
///
/// # Panics
///
/// Panics if `width < 3`.
#[must_use]
pub fn walled_grid(width: u32, height: u32) -> Grid {
    assert!(width >= 3, "walled grid needs room for a wall");
    let mut builder = GridBuilder::new(width, height)
        .with_start(0, height / 2)
        .with_goal(width - 1, height / 2);
    for y in 0..height {
        builder.set_role(Coord::new(width / 2, y), CellRole::Obstacle);
    }
    builder.build().expect("walled grid fixture is valid")
}

/// Single row where the only route passes over a trap: `S.T.G`.
#[must_use]
pub fn trap_corridor() -> Grid {
    Grid::from_ascii(&["S.T.G"]).expect("trap corridor fixture is valid")
}

/// The 8x8 classroom map with four traps.
#[must_use]
pub fn classroom() -> Grid {
    MapDescription::classroom()
        .to_grid()
        .expect("classroom fixture is valid")
}

/// Switchback maze: every odd row is a wall with one gap, alternating ends.
///
/// Start is `(0, 0)`; the goal is the right end of the last open row.
///
/// # Panics
///
/// Panics if `width < 2` or `height < 3`.
#[must_use]
pub fn serpentine_grid(width: u32, height: u32) -> Grid {
    assert!(width >= 2 && height >= 3, "serpentine grid too small");
    let mut builder = GridBuilder::new(width, height).with_start(0, 0);
    for y in (1..height).step_by(2) {
        let gap = if (y / 2) % 2 == 0 { width - 1 } else { 0 };
        for x in (0..width).filter(|&x| x != gap) {
            builder.set_role(Coord::new(x, y), CellRole::Obstacle);
        }
    }
    let last_open_row = if (height - 1) % 2 == 0 {
        height - 1
    } else {
        height - 2
    };
    builder
        .with_goal(width - 1, last_open_row)
        .build()
        .expect("serpentine grid fixture is valid")
}

/// Classroom-sized RON map in record form, for loader tests.
pub const CLASSROOM_RON: &str = r#"
MapDescription(
    name: "classroom",
    description: "8x8 room with four traps",
    layout: Record(
        width: 8,
        height: 8,
        start: (x: 1, y: 1),
        goal: (x: 6, y: 6),
        traps: [(x: 3, y: 2), (x: 4, y: 4), (x: 2, y: 5), (x: 5, y: 1)],
    ),
)
"#;

/// Small layout-form map with a custom legend, for loader tests.
pub const LEGEND_RON: &str = r#"
MapDescription(
    name: "garden",
    layout: Layout(
        rows: [
            "S..~...",
            ".#.~.T.",
            ".#...xG",
        ],
        legend: {
            '~': Custom(blocking: false),
            'x': Custom(blocking: true),
        },
    ),
)
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_valid() {
        assert_eq!(open_grid(6, 6).goal(), Coord::new(5, 5));
        assert_eq!(walled_grid(5, 5).obstacles().len(), 5);
        assert_eq!(trap_corridor().traps(), vec![Coord::new(2, 0)]);
        assert_eq!(classroom().traps().len(), 4);
        let serpentine = serpentine_grid(5, 5);
        assert_eq!(serpentine.goal(), Coord::new(4, 4));
        assert_eq!(serpentine.role(Coord::new(4, 1)), Some(CellRole::Normal));
        assert_eq!(serpentine.role(Coord::new(0, 3)), Some(CellRole::Normal));
    }

    #[test]
    fn test_ron_fixtures_parse() {
        let classroom_map = MapDescription::from_ron_str(CLASSROOM_RON).unwrap();
        assert_eq!(classroom_map.to_grid().unwrap(), classroom());

        let garden = MapDescription::from_ron_str(LEGEND_RON).unwrap();
        let grid = garden.to_grid().unwrap();
        assert_eq!(grid.goal(), Coord::new(6, 2));
        assert!(grid.role(Coord::new(5, 2)).unwrap().blocks_movement());
    }
}
