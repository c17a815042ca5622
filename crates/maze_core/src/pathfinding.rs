//! Grid pathfinding using breadth-first search.
//!
//! The grid is unweighted and four-connected, so BFS discovers cells in
//! non-decreasing distance order and the first route to reach the goal is a
//! shortest one. Neighbours are expanded in [`Direction::EXPLORATION_ORDER`]
//! which makes the chosen route reproducible when several shortest routes
//! exist.
//!
//! Traps are treated as walls while planning. The movement executor would
//! let the robot step onto one, but the run would end there. The same holds
//! for goal cells other than the target: entering one ends the run, so a
//! planned path never crosses them.

use std::collections::VecDeque;

use crate::error::{MazeError, Result};
use crate::grid::{row_major_index, CellRole, Coord, Direction, Grid, Path};

/// Find a shortest trap-free path from `start` to `goal`.
///
/// Returns `Ok(None)` when no route exists. That is an expected outcome on a
/// valid map, not an error.
///
/// # Errors
///
/// Returns an invalid-input error ([`MazeError::is_invalid_input`]) if:
/// - the grid has zero area
/// - start or goal lies outside the grid
/// - start or goal sits on a blocking cell
pub fn find_path(grid: &Grid, start: Coord, goal: Coord) -> Result<Option<Path>> {
    validate_endpoint(grid, start)?;
    validate_endpoint(grid, goal)?;

    if start == goal {
        return Ok(Some(Path::new()));
    }

    let path = search(grid, start, goal);
    match &path {
        Some(path) => {
            tracing::debug!(%start, %goal, length = path.len(), route = %path, "Path found");
            #[cfg(feature = "debug-validation")]
            debug_validate(grid, start, goal, path);
        }
        None => tracing::debug!(%start, %goal, "No path"),
    }
    Ok(path)
}

/// Find a route from the grid's start cell to its primary goal.
///
/// # Errors
///
/// See [`find_path`].
pub fn find_route(grid: &Grid) -> Result<Option<Path>> {
    find_path(grid, grid.start(), grid.goal())
}

fn validate_endpoint(grid: &Grid, coord: Coord) -> Result<()> {
    if grid.area() == 0 {
        return Err(MazeError::EmptyGrid);
    }
    let role = grid.role(coord).ok_or(MazeError::OutOfBounds {
        x: i64::from(coord.x),
        y: i64::from(coord.y),
        width: grid.width(),
        height: grid.height(),
    })?;
    if role.blocks_movement() {
        return Err(MazeError::BlockedEndpoint {
            x: coord.x,
            y: coord.y,
        });
    }
    Ok(())
}

/// Internal BFS working on row-major indices.
fn search(grid: &Grid, start: Coord, goal: Coord) -> Option<Path> {
    // Direction used to first enter each cell.
    let mut arrived_by: Vec<Option<Direction>> = vec![None; grid.area()];
    let mut visited = vec![false; grid.area()];
    let mut frontier = VecDeque::new();

    visited[grid.index(start)?] = true;
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        if current == goal {
            return Some(reconstruct_path(grid, &arrived_by, start, goal));
        }

        for direction in Direction::EXPLORATION_ORDER {
            let Some(next) = grid.neighbor(current, direction) else {
                continue;
            };
            let Some(index) = grid.index(next) else {
                continue;
            };
            if visited[index] {
                continue;
            }
            // Any other goal would end the run early, so it counts as a wall.
            let passable = next == goal
                || grid
                    .role(next)
                    .is_some_and(|r| r.is_plannable() && r != CellRole::Goal);
            if !passable {
                continue;
            }

            visited[index] = true;
            arrived_by[index] = Some(direction);
            frontier.push_back(next);
        }
    }

    None
}

/// Walk back from the goal along the recorded arrival directions.
fn reconstruct_path(
    grid: &Grid,
    arrived_by: &[Option<Direction>],
    start: Coord,
    goal: Coord,
) -> Path {
    let mut moves = Vec::new();
    let mut current = goal;

    while current != start {
        let Some(direction) = grid.index(current).and_then(|i| arrived_by[i]) else {
            break;
        };
        moves.push(direction);
        match grid.neighbor(current, direction.opposite()) {
            Some(previous) => current = previous,
            None => break,
        }
    }

    moves.reverse();
    Path::from(moves)
}

#[cfg(feature = "debug-validation")]
fn debug_validate(grid: &Grid, start: Coord, goal: Coord, path: &Path) {
    let visited = path
        .trace(grid, start)
        .expect("planned path must stay inside the grid");
    assert_eq!(visited.last().copied(), Some(goal), "planned path must end at goal");
    for coord in &visited[..visited.len() - 1] {
        let role = grid.role(*coord).expect("traced coordinate is in bounds");
        assert!(role.is_plannable(), "planned path crosses {role:?} at {coord}");
    }
}

/// BFS distance field from a single origin over plannable cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    origin: Coord,
    width: u32,
    height: u32,
    /// Move count from the origin, row-major; `None` if unreachable.
    distances: Vec<Option<u32>>,
}

impl DistanceMap {
    /// Origin of the field.
    #[must_use]
    pub const fn origin(&self) -> Coord {
        self.origin
    }

    /// Distance to `coord`, or `None` if unreachable or out of bounds.
    #[must_use]
    pub fn distance(&self, coord: Coord) -> Option<u32> {
        row_major_index(self.width, self.height, coord)
            .and_then(|i| self.distances.get(i).copied().flatten())
    }

    /// Number of reachable cells, origin included.
    #[must_use]
    pub fn reachable(&self) -> usize {
        self.distances.iter().filter(|d| d.is_some()).count()
    }

    /// Largest finite distance.
    #[must_use]
    pub fn max_distance(&self) -> Option<u32> {
        self.distances.iter().flatten().copied().max()
    }
}

/// Compute the distance from `origin` to every plannable cell.
///
/// # Errors
///
/// Same endpoint validation as [`find_path`].
pub fn distance_map(grid: &Grid, origin: Coord) -> Result<DistanceMap> {
    validate_endpoint(grid, origin)?;

    let mut distances = vec![None; grid.area()];
    let mut frontier = VecDeque::new();
    if let Some(index) = grid.index(origin) {
        distances[index] = Some(0);
        frontier.push_back((origin, 0u32));
    }

    while let Some((current, distance)) = frontier.pop_front() {
        for direction in Direction::EXPLORATION_ORDER {
            let Some(next) = grid.neighbor(current, direction) else {
                continue;
            };
            let Some(index) = grid.index(next) else {
                continue;
            };
            if distances[index].is_some() || !grid.role(next).is_some_and(|r| r.is_plannable()) {
                continue;
            }
            distances[index] = Some(distance + 1);
            frontier.push_back((next, distance + 1));
        }
    }

    Ok(DistanceMap {
        origin,
        width: grid.width(),
        height: grid.height(),
        distances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridBuilder;
    use Direction::{Down, Left, Right, Up};

    fn open_grid(width: u32, height: u32) -> Grid {
        GridBuilder::new(width, height)
            .with_start(0, 0)
            .with_goal(width - 1, height - 1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_open_grid_shape() {
        let grid = open_grid(6, 6);
        let path = find_path(&grid, Coord::new(0, 0), Coord::new(5, 5))
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 10);
        assert_eq!(path.to_string(), "RRRRRDDDDD");
    }

    #[test]
    fn test_same_cell_is_empty_path() {
        let grid = open_grid(4, 4);
        let path = find_path(&grid, Coord::new(2, 2), Coord::new(2, 2)).unwrap();
        assert_eq!(path, Some(Path::new()));
    }

    #[test]
    fn test_path_around_obstacle() {
        let mut builder = GridBuilder::new(5, 5).with_start(0, 2).with_goal(4, 2);
        for y in 1..5 {
            builder.set_role(Coord::new(2, y), CellRole::Obstacle);
        }
        let grid = builder.build().unwrap();

        let path = find_route(&grid).unwrap().unwrap();
        // Up over the wall through (2, 0) and back down.
        assert_eq!(path.len(), 8);
        let visited = path.trace(&grid, grid.start()).unwrap();
        assert!(visited
            .iter()
            .all(|c| !grid.role(*c).unwrap().blocks_movement()));
        assert_eq!(visited.last(), Some(&grid.goal()));
    }

    #[test]
    fn test_no_path_through_wall() {
        let mut builder = GridBuilder::new(5, 5).with_start(0, 2).with_goal(4, 2);
        for y in 0..5 {
            builder.set_role(Coord::new(2, y), CellRole::Obstacle);
        }
        let grid = builder.build().unwrap();
        assert_eq!(find_route(&grid).unwrap(), None);
    }

    #[test]
    fn test_traps_are_impassable_for_planning() {
        let grid = Grid::from_ascii(&["S.T.G"]).unwrap();
        assert_eq!(find_route(&grid).unwrap(), None);
    }

    #[test]
    fn test_route_detours_around_trap() {
        let grid = Grid::from_ascii(&["S.T.G", "....."]).unwrap();
        let path = find_route(&grid).unwrap().unwrap();
        assert_eq!(path.as_slice(), &[Right, Down, Right, Right, Right, Up]);
    }

    #[test]
    fn test_goal_on_trap_is_reachable() {
        let grid = Grid::from_ascii(&["S..T", "...G"]).unwrap();
        let path = find_path(&grid, grid.start(), Coord::new(3, 0))
            .unwrap()
            .unwrap();
        assert_eq!(path.as_slice(), &[Right, Right, Right]);
    }

    #[test]
    fn test_out_of_bounds_is_invalid_input() {
        let grid = open_grid(3, 3);
        let err = find_path(&grid, Coord::new(0, 0), Coord::new(3, 0)).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(matches!(err, MazeError::OutOfBounds { x: 3, y: 0, .. }));
    }

    #[test]
    fn test_blocked_endpoint_is_invalid_input() {
        let grid = Grid::from_ascii(&["S#", ".G"]).unwrap();
        let err = find_path(&grid, Coord::new(1, 0), grid.goal()).unwrap_err();
        assert!(matches!(err, MazeError::BlockedEndpoint { x: 1, y: 0 }));
        let err = find_path(&grid, grid.start(), Coord::new(1, 0)).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_determinism() {
        let grid = Grid::from_ascii(&[
            "S...#....",
            ".##.#.##.",
            ".#..T..#.",
            ".#.###.#.",
            "...#...#G",
        ])
        .unwrap();
        let first = find_route(&grid).unwrap();
        for _ in 0..5 {
            assert_eq!(find_route(&grid).unwrap(), first);
        }
    }

    #[test]
    fn test_equal_length_routes_tie_break() {
        // RRD, RDR and DRR are all shortest; horizontal moves expand first.
        let grid = Grid::from_ascii(&["S..", "..G"]).unwrap();
        let path = find_route(&grid).unwrap().unwrap();
        assert_eq!(path.as_slice(), &[Right, Right, Down]);
    }

    #[test]
    fn test_leftward_route() {
        let grid = Grid::from_ascii(&["G.S", "..."]).unwrap();
        let path = find_route(&grid).unwrap().unwrap();
        assert_eq!(path.as_slice(), &[Left, Left]);
    }

    #[test]
    fn test_route_avoids_other_goals() {
        let grid = Grid::from_ascii(&["G.GS", "...."]).unwrap();
        assert_eq!(grid.goal(), Coord::new(0, 0));

        let path = find_route(&grid).unwrap().unwrap();
        assert_eq!(path.len(), 5);

        let mut position = grid.start();
        let records = crate::movement::run(&grid, &mut position, &path);
        assert_eq!(records.len(), path.len());
        assert_eq!(position, Coord::new(0, 0));

        let corridor = Grid::from_ascii(&["G.GS"]).unwrap();
        assert_eq!(find_route(&corridor).unwrap(), None);
        assert_eq!(
            find_path(&corridor, corridor.start(), Coord::new(2, 0)).unwrap(),
            Some(Path::from(vec![Left]))
        );
    }

    #[test]
    fn test_distance_map() {
        let grid = Grid::from_ascii(&["S.#", "..G"]).unwrap();
        let field = distance_map(&grid, grid.start()).unwrap();
        assert_eq!(field.origin(), Coord::new(0, 0));
        assert_eq!(field.distance(Coord::new(0, 0)), Some(0));
        assert_eq!(field.distance(Coord::new(2, 1)), Some(3));
        assert_eq!(field.distance(Coord::new(2, 0)), None);
        assert_eq!(field.distance(Coord::new(9, 9)), None);
        assert_eq!(field.reachable(), 5);
        assert_eq!(field.max_distance(), Some(3));
    }
}
