//! Reference shortest-distance search.
//!
//! A deliberately naive Bellman-Ford style relaxation over the grid. It
//! shares no code with the breadth-first planner, so agreement between the
//! two is meaningful evidence of optimality.

use maze_core::grid::{CellRole, Coord, Direction, Grid, Path};

/// Shortest number of moves from `start` to `goal` that never enters a
/// blocked, trapped or goal cell other than `goal` itself.
///
/// Returns `None` if `goal` is unreachable or either endpoint is outside
/// the grid.
#[must_use]
pub fn shortest_distance(grid: &Grid, start: Coord, goal: Coord) -> Option<u32> {
    let start_index = grid.index(start)?;
    let goal_index = grid.index(goal)?;
    let mut dist = vec![u32::MAX; grid.area()];
    dist[start_index] = 0;

    let mut changed = true;
    while changed {
        changed = false;
        for (coord, _) in grid.cells() {
            let Some(here) = grid.index(coord).map(|i| dist[i]) else {
                continue;
            };
            if here == u32::MAX {
                continue;
            }
            for direction in Direction::ALL {
                let Some(next) = grid.neighbor(coord, direction) else {
                    continue;
                };
                if !enterable(grid, next, goal) {
                    continue;
                }
                if let Some(next_index) = grid.index(next) {
                    if dist[next_index] > here + 1 {
                        dist[next_index] = here + 1;
                        changed = true;
                    }
                }
            }
        }
    }

    (dist[goal_index] != u32::MAX).then_some(dist[goal_index])
}

/// True if `path` walks from `start` to `goal` inside the grid, never
/// entering a blocked or trapped cell before the final move.
#[must_use]
pub fn is_valid_route(grid: &Grid, start: Coord, goal: Coord, path: &Path) -> bool {
    let Some(visited) = path.trace(grid, start) else {
        return false;
    };
    let ends_at_goal = visited.last().copied().unwrap_or(start) == goal;
    ends_at_goal && visited.iter().all(|&cell| enterable(grid, cell, goal))
}

fn enterable(grid: &Grid, cell: Coord, goal: Coord) -> bool {
    cell == goal
        || grid
            .role(cell)
            .is_some_and(|role| role.is_plannable() && role != CellRole::Goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use maze_core::grid::Direction::{Down, Right, Up};

    #[test]
    fn test_open_grid_distance_is_manhattan() {
        let grid = fixtures::open_grid(6, 4);
        assert_eq!(shortest_distance(&grid, grid.start(), grid.goal()), Some(8));
    }

    #[test]
    fn test_wall_is_unreachable() {
        let grid = fixtures::walled_grid(5, 5);
        assert_eq!(shortest_distance(&grid, grid.start(), grid.goal()), None);
    }

    #[test]
    fn test_trap_corridor_is_unreachable() {
        let grid = fixtures::trap_corridor();
        assert_eq!(shortest_distance(&grid, grid.start(), grid.goal()), None);
    }

    #[test]
    fn test_other_goals_are_not_crossed() {
        let grid = Grid::from_ascii(&["G.GS", "...."]).unwrap();
        assert_eq!(shortest_distance(&grid, grid.start(), grid.goal()), Some(5));
        assert_eq!(shortest_distance(&grid, grid.start(), Coord::new(2, 0)), Some(1));
    }

    #[test]
    fn test_valid_route_checks() {
        let grid = Grid::from_ascii(&["S.T", "..G"]).unwrap();
        let start = grid.start();
        let goal = grid.goal();
        assert!(is_valid_route(&grid, start, goal, &Path::from(vec![Right, Down, Right])));
        assert!(!is_valid_route(&grid, start, goal, &Path::from(vec![Right, Right, Down])));
        assert!(!is_valid_route(&grid, start, goal, &Path::from(vec![Up, Right])));
    }
}
