//! Grid data model: coordinates, directions, paths and cell roles.
//!
//! The coordinate origin is the top-left corner; `x` grows to the right and
//! `y` grows downward.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Result};

/// Integer cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Coord {
    /// Column, growing to the right.
    pub x: u32,
    /// Row, growing downward.
    pub y: u32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Apply a direction's unit displacement.
    ///
    /// Returns `None` if the result would have a negative component. Upper
    /// bounds are the grid's concern, see [`Grid::neighbor`].
    #[must_use]
    pub fn offset(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl From<(u32, u32)> for Coord {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Toward column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl Direction {
    /// All four directions in declaration order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Order in which the pathfinder expands neighbours.
    ///
    /// Fixed so that equal-length routes are chosen reproducibly.
    pub const EXPLORATION_ORDER: [Self; 4] = [Self::Right, Self::Left, Self::Down, Self::Up];

    /// Unit displacement `(dx, dy)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Canonical single-character token.
    #[must_use]
    pub const fn token(self) -> char {
        match self {
            Self::Up => 'U',
            Self::Down => 'D',
            Self::Left => 'L',
            Self::Right => 'R',
        }
    }

    /// Parse a canonical token character. Only uppercase letters are accepted.
    #[must_use]
    pub const fn from_token(c: char) -> Option<Self> {
        match c {
            'U' => Some(Self::Up),
            'D' => Some(Self::Down),
            'L' => Some(Self::Left),
            'R' => Some(Self::Right),
            _ => None,
        }
    }

    /// Parse a full direction word (`up`, `Down`, `LEFT`, ...).
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| word.eq_ignore_ascii_case(d.name()))
    }

    /// Lowercase name of the direction.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Ordered sequence of moves.
///
/// An empty path is valid and means there is nothing to do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Direction>);

impl Path {
    /// Create an empty path.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of moves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the path has no moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a move.
    pub fn push(&mut self, direction: Direction) {
        self.0.push(direction);
    }

    /// Moves as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Direction] {
        &self.0
    }

    /// Iterate over the moves.
    pub fn iter(&self) -> std::slice::Iter<'_, Direction> {
        self.0.iter()
    }

    /// Coordinates visited when walking the path from `start`, excluding
    /// `start` itself. Returns `None` if any move leaves the grid.
    #[must_use]
    pub fn trace(&self, grid: &Grid, start: Coord) -> Option<Vec<Coord>> {
        let mut current = start;
        let mut visited = Vec::with_capacity(self.len());
        for &direction in &self.0 {
            current = grid.neighbor(current, direction)?;
            visited.push(current);
        }
        Some(visited)
    }
}

impl From<Vec<Direction>> for Path {
    fn from(moves: Vec<Direction>) -> Self {
        Self(moves)
    }
}

impl FromIterator<Direction> for Path {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Direction;
    type IntoIter = std::slice::Iter<'a, Direction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl AsRef<[Direction]> for Path {
    fn as_ref(&self) -> &[Direction] {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for direction in &self.0 {
            write!(f, "{direction}")?;
        }
        Ok(())
    }
}

/// Semantic role of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellRole {
    /// Where the robot begins. Exactly one per grid.
    Start,
    /// Winning cell. Stepping onto it ends the run.
    Goal,
    /// Passable but lethal. Stepping onto it ends the run.
    Trap,
    /// Impassable.
    Obstacle,
    /// Plain walkable floor.
    #[default]
    Normal,
    /// Author-defined decoration; walkable unless `blocking`.
    Custom {
        /// Whether the cell stops movement like an obstacle.
        #[serde(default)]
        blocking: bool,
    },
}

impl CellRole {
    /// True if the executor refuses to enter this cell.
    #[must_use]
    pub const fn blocks_movement(self) -> bool {
        matches!(self, Self::Obstacle | Self::Custom { blocking: true })
    }

    /// True if the pathfinder may route through this cell.
    ///
    /// Traps are passable for the executor but never planned through.
    #[must_use]
    pub const fn is_plannable(self) -> bool {
        !self.blocks_movement() && !matches!(self, Self::Trap)
    }

    /// Default map glyph for this role.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Start => 'S',
            Self::Goal => 'G',
            Self::Trap => 'T',
            Self::Obstacle => '#',
            Self::Normal => '.',
            Self::Custom { blocking: true } => '%',
            Self::Custom { blocking: false } => '~',
        }
    }

    /// Role for a default map glyph.
    #[must_use]
    pub const fn from_glyph(c: char) -> Option<Self> {
        match c {
            'S' => Some(Self::Start),
            'G' => Some(Self::Goal),
            'T' => Some(Self::Trap),
            '#' => Some(Self::Obstacle),
            '.' => Some(Self::Normal),
            '%' => Some(Self::Custom { blocking: true }),
            '~' => Some(Self::Custom { blocking: false }),
            _ => None,
        }
    }
}

/// Largest number of cells a grid may hold (a 2048x2048 map).
pub const MAX_CELLS: usize = 1 << 22;

/// Immutable rectangular navigation grid.
///
/// Construction validates that the grid has a non-zero area, exactly one
/// start cell and at least one goal cell. Once built it is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData", into = "GridData")]
pub struct Grid {
    /// Grid width in cells.
    width: u32,
    /// Grid height in cells.
    height: u32,
    /// Cell roles stored in row-major order.
    cells: Vec<CellRole>,
    /// The single start cell.
    start: Coord,
    /// All goal cells in row-major order.
    goals: Vec<Coord>,
}

/// Serialized form of a [`Grid`], validated on the way back in.
#[derive(Serialize, Deserialize)]
struct GridData {
    width: u32,
    height: u32,
    cells: Vec<CellRole>,
}

impl TryFrom<GridData> for Grid {
    type Error = MazeError;

    fn try_from(data: GridData) -> Result<Self> {
        Self::from_cells(data.width, data.height, data.cells)
    }
}

impl From<Grid> for GridData {
    fn from(grid: Grid) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            cells: grid.cells,
        }
    }
}

impl Grid {
    /// Build a grid from row-major cell roles.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::EmptyGrid`] for a zero-area grid and
    /// [`MazeError::InvalidMap`] if the grid exceeds [`MAX_CELLS`], the cell
    /// count does not match the dimensions or the start/goal invariants are
    /// violated.
    pub fn from_cells(width: u32, height: u32, cells: Vec<CellRole>) -> Result<Self> {
        let expected = cell_count(width, height)?;
        if cells.len() != expected {
            return Err(MazeError::invalid_map(format!(
                "expected {expected} cells for a {width}x{height} grid, got {}",
                cells.len()
            )));
        }

        let mut starts = Vec::new();
        let mut goals = Vec::new();
        for (index, role) in cells.iter().enumerate() {
            let coord = index_to_coord(width, index);
            match role {
                CellRole::Start => starts.push(coord),
                CellRole::Goal => goals.push(coord),
                _ => {}
            }
        }

        let start = match starts.as_slice() {
            [only] => *only,
            [] => return Err(MazeError::invalid_map("grid has no start cell")),
            many => {
                return Err(MazeError::invalid_map(format!(
                    "grid has {} start cells, expected exactly one",
                    many.len()
                )))
            }
        };
        if goals.is_empty() {
            return Err(MazeError::invalid_map("grid has no goal cell"));
        }

        Ok(Self {
            width,
            height,
            cells,
            start,
            goals,
        })
    }

    /// Build a grid from rows of default glyphs (`S`, `G`, `T`, `#`, `.`,
    /// `%`, `~`).
    ///
    /// # Errors
    ///
    /// Returns [`MazeError::InvalidMap`] for ragged rows or unknown glyphs,
    /// plus every error of [`Grid::from_cells`].
    pub fn from_ascii<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        crate::map::normalize_rows(rows, CellRole::from_glyph)
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// The start cell.
    #[must_use]
    pub const fn start(&self) -> Coord {
        self.start
    }

    /// The primary goal: first goal cell in row-major order.
    #[must_use]
    pub fn goal(&self) -> Coord {
        self.goals[0]
    }

    /// Every goal cell in row-major order.
    #[must_use]
    pub fn goals(&self) -> &[Coord] {
        &self.goals
    }

    /// True if `coord` is one of the recorded goal cells.
    #[must_use]
    pub fn is_goal(&self, coord: Coord) -> bool {
        self.goals.contains(&coord)
    }

    /// Every trap cell in row-major order.
    #[must_use]
    pub fn traps(&self) -> Vec<Coord> {
        self.coords_with(|role| role == CellRole::Trap)
    }

    /// Every cell the executor cannot enter, in row-major order.
    #[must_use]
    pub fn obstacles(&self) -> Vec<Coord> {
        self.coords_with(CellRole::blocks_movement)
    }

    /// Check if coordinates are within grid bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Role at `coord`, or `None` if out of bounds.
    #[must_use]
    pub fn role(&self, coord: Coord) -> Option<CellRole> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// The in-bounds neighbour of `coord` in `direction`.
    #[must_use]
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        coord
            .offset(direction)
            .filter(|&target| self.in_bounds(target))
    }

    /// Iterate over `(coord, role)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, CellRole)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &role)| (index_to_coord(self.width, i), role))
    }

    /// Row-major index of `coord`.
    #[must_use]
    pub fn index(&self, coord: Coord) -> Option<usize> {
        row_major_index(self.width, self.height, coord)
    }

    fn coords_with(&self, predicate: impl Fn(CellRole) -> bool) -> Vec<Coord> {
        self.cells()
            .filter(|&(_, role)| predicate(role))
            .map(|(coord, _)| coord)
            .collect()
    }
}

/// Row-major index of `coord` in a `width` x `height` grid.
#[inline]
pub(crate) fn row_major_index(width: u32, height: u32, coord: Coord) -> Option<usize> {
    (coord.x < width && coord.y < height)
        .then(|| (coord.y as usize) * (width as usize) + (coord.x as usize))
}

/// Number of cells in a `width` x `height` grid.
///
/// # Errors
///
/// Returns [`MazeError::EmptyGrid`] for a zero area and
/// [`MazeError::InvalidMap`] above [`MAX_CELLS`].
pub fn cell_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(MazeError::EmptyGrid);
    }
    (width as usize)
        .checked_mul(height as usize)
        .filter(|&count| count <= MAX_CELLS)
        .ok_or_else(|| {
            MazeError::invalid_map(format!(
                "{width}x{height} grid exceeds the limit of {MAX_CELLS} cells"
            ))
        })
}

#[inline]
fn index_to_coord(width: u32, index: usize) -> Coord {
    let width = width as usize;
    Coord::new((index % width) as u32, (index / width) as u32)
}

/// Mutable builder producing a validated [`Grid`].
#[derive(Debug, Clone)]
pub struct GridBuilder {
    width: u32,
    height: u32,
    cells: Vec<CellRole>,
}

impl GridBuilder {
    /// Start from an all-[`CellRole::Normal`] grid.
    ///
    /// Dimensions rejected by [`cell_count`] allocate nothing; every cell
    /// then reads as out of bounds and [`GridBuilder::build`] fails.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let cells = cell_count(width, height)
            .map(|count| vec![CellRole::Normal; count])
            .unwrap_or_default();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Set the role at `coord`.
    ///
    /// Returns `false` if out of bounds.
    pub fn set_role(&mut self, coord: Coord, role: CellRole) -> bool {
        match self.slot(coord).and_then(|i| self.cells.get_mut(i)) {
            Some(cell) => {
                *cell = role;
                true
            }
            None => false,
        }
    }

    /// Role at `coord`, or `None` if out of bounds.
    #[must_use]
    pub fn role(&self, coord: Coord) -> Option<CellRole> {
        self.slot(coord).and_then(|i| self.cells.get(i)).copied()
    }

    fn slot(&self, coord: Coord) -> Option<usize> {
        row_major_index(self.width, self.height, coord)
    }

    /// Place the start cell.
    #[must_use]
    pub fn with_start(mut self, x: u32, y: u32) -> Self {
        self.set_role(Coord::new(x, y), CellRole::Start);
        self
    }

    /// Place a goal cell.
    #[must_use]
    pub fn with_goal(mut self, x: u32, y: u32) -> Self {
        self.set_role(Coord::new(x, y), CellRole::Goal);
        self
    }

    /// Place a trap cell.
    #[must_use]
    pub fn with_trap(mut self, x: u32, y: u32) -> Self {
        self.set_role(Coord::new(x, y), CellRole::Trap);
        self
    }

    /// Place an obstacle cell.
    #[must_use]
    pub fn with_obstacle(mut self, x: u32, y: u32) -> Self {
        self.set_role(Coord::new(x, y), CellRole::Obstacle);
        self
    }

    /// Validate and freeze the grid.
    ///
    /// # Errors
    ///
    /// See [`Grid::from_cells`].
    pub fn build(self) -> Result<Grid> {
        Grid::from_cells(self.width, self.height, self.cells)
    }
}
