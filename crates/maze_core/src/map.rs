//! Map descriptions and their normalization into a [`Grid`].
//!
//! Two authoring conventions are supported and both end up as the same
//! [`Grid`]:
//!
//! - a character layout with a tag legend,
//! - an explicit record of dimensions plus start, goal and hazard lists.
//!
//! # Example RON
//!
//! ```ron
//! MapDescription(
//!     name: "corridor",
//!     layout: Layout(
//!         rows: [
//!             "S..~..G",
//!             "##.#.##",
//!         ],
//!         legend: { '~': Custom(blocking: false) },
//!     ),
//! )
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Result};
use crate::grid::{cell_count, CellRole, Coord, Grid, GridBuilder};

/// A named map in either authoring form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDescription {
    /// Map name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Cell layout.
    pub layout: MapLayout,
}

/// The two map-authoring forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapLayout {
    /// Rows of single-character tags.
    Layout {
        /// One string per row, top row first.
        rows: Vec<String>,
        /// Tag lookup. Characters missing here fall back to the default
        /// glyphs of [`CellRole::from_glyph`].
        #[serde(default)]
        legend: BTreeMap<char, CellRole>,
    },
    /// Dimensions plus explicit coordinates.
    Record {
        /// Grid width in cells.
        width: u32,
        /// Grid height in cells.
        height: u32,
        /// Start cell.
        start: Coord,
        /// Goal cell.
        goal: Coord,
        /// Trap cells.
        #[serde(default)]
        traps: Vec<Coord>,
        /// Obstacle cells.
        #[serde(default)]
        obstacles: Vec<Coord>,
    },
}

impl MapDescription {
    /// Load a map from a RON or JSON file, chosen by extension.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as RON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let label = path.display().to_string();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&contents).map_err(|e| MazeError::parse(label, e))
        } else {
            ron::from_str(&contents).map_err(|e| MazeError::parse(label, e))
        }
    }

    /// Parse from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        ron::from_str(ron).map_err(|e| MazeError::parse("<ron>", e))
    }

    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MazeError::parse("<json>", e))
    }

    /// Serialize to pretty RON.
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| MazeError::parse(&self.name, e))
    }

    /// Normalize into a validated [`Grid`].
    pub fn to_grid(&self) -> Result<Grid> {
        let grid = match &self.layout {
            MapLayout::Layout { rows, legend } => normalize_rows(rows, |c| {
                legend.get(&c).copied().or_else(|| CellRole::from_glyph(c))
            }),
            MapLayout::Record {
                width,
                height,
                start,
                goal,
                traps,
                obstacles,
            } => normalize_record(*width, *height, *start, *goal, traps, obstacles),
        }?;
        tracing::debug!(
            map = %self.name,
            width = grid.width(),
            height = grid.height(),
            traps = grid.traps().len(),
            "Normalized map description"
        );
        Ok(grid)
    }

    /// The 8x8 classroom map: start (1, 1), goal (6, 6), four traps.
    #[must_use]
    pub fn classroom() -> Self {
        Self {
            name: "classroom".to_string(),
            description: "8x8 room with four traps between the robot and the goal".to_string(),
            layout: MapLayout::Record {
                width: 8,
                height: 8,
                start: Coord::new(1, 1),
                goal: Coord::new(6, 6),
                traps: vec![
                    Coord::new(3, 2),
                    Coord::new(4, 4),
                    Coord::new(2, 5),
                    Coord::new(5, 1),
                ],
                obstacles: Vec::new(),
            },
        }
    }

    /// An obstacle-free map with start top-left and goal bottom-right.
    #[must_use]
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            name: format!("open_{width}x{height}"),
            description: "Open floor, no hazards".to_string(),
            layout: MapLayout::Record {
                width,
                height,
                start: Coord::new(0, 0),
                goal: Coord::new(width.saturating_sub(1), height.saturating_sub(1)),
                traps: Vec::new(),
                obstacles: Vec::new(),
            },
        }
    }

    /// Look up a built-in map by name (`classroom`, `open`).
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "classroom" => Some(Self::classroom()),
            "open" => Some(Self::open(6, 6)),
            _ => None,
        }
    }
}

/// Build a grid from character rows, resolving each character with `resolve`.
pub(crate) fn normalize_rows<S, F>(rows: &[S], resolve: F) -> Result<Grid>
where
    S: AsRef<str>,
    F: Fn(char) -> Option<CellRole>,
{
    let height = u32::try_from(rows.len())
        .map_err(|_| MazeError::invalid_map("too many rows"))?;
    let width = rows
        .first()
        .map_or(0, |row| row.as_ref().chars().count());
    let width = u32::try_from(width).map_err(|_| MazeError::invalid_map("row too long"))?;

    let mut cells = Vec::with_capacity((width as usize) * (height as usize));
    for (y, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        let row_width = row.chars().count();
        if row_width != width as usize {
            return Err(MazeError::invalid_map(format!(
                "row {y} has {row_width} cells, expected {width}"
            )));
        }
        for (x, c) in row.chars().enumerate() {
            let role = resolve(c).ok_or_else(|| {
                MazeError::invalid_map(format!("unknown tag '{c}' at ({x}, {y})"))
            })?;
            cells.push(role);
        }
    }

    Grid::from_cells(width, height, cells)
}

fn normalize_record(
    width: u32,
    height: u32,
    start: Coord,
    goal: Coord,
    traps: &[Coord],
    obstacles: &[Coord],
) -> Result<Grid> {
    cell_count(width, height)?;
    let out_of_bounds = |coord: Coord| MazeError::OutOfBounds {
        x: i64::from(coord.x),
        y: i64::from(coord.y),
        width,
        height,
    };
    for endpoint in [start, goal] {
        if endpoint.x >= width || endpoint.y >= height {
            return Err(out_of_bounds(endpoint));
        }
    }
    if start == goal {
        return Err(MazeError::invalid_map(format!(
            "start and goal share the cell {start}"
        )));
    }

    let mut builder = GridBuilder::new(width, height)
        .with_start(start.x, start.y)
        .with_goal(goal.x, goal.y);

    let hazards = traps
        .iter()
        .map(|&c| (c, CellRole::Trap))
        .chain(obstacles.iter().map(|&c| (c, CellRole::Obstacle)));
    for (coord, role) in hazards {
        let existing = builder.role(coord).ok_or_else(|| out_of_bounds(coord))?;
        if existing == CellRole::Normal {
            builder.set_role(coord, role);
        } else if existing != role {
            return Err(MazeError::invalid_map(format!(
                "cell {coord} cannot be both {existing:?} and {role:?}"
            )));
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classroom_normalizes() {
        let grid = MapDescription::classroom().to_grid().unwrap();
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.start(), Coord::new(1, 1));
        assert_eq!(grid.goal(), Coord::new(6, 6));
        assert_eq!(grid.traps().len(), 4);
        assert_eq!(grid.role(Coord::new(5, 1)), Some(CellRole::Trap));
    }

    #[test]
    fn test_layout_with_custom_legend() {
        let map = MapDescription {
            name: "legend".to_string(),
            description: String::new(),
            layout: MapLayout::Layout {
                rows: vec!["s.x".to_string(), "w.g".to_string()],
                legend: BTreeMap::from([
                    ('s', CellRole::Start),
                    ('g', CellRole::Goal),
                    ('x', CellRole::Trap),
                    ('w', CellRole::Custom { blocking: true }),
                ]),
            },
        };
        let grid = map.to_grid().unwrap();
        assert_eq!(grid.start(), Coord::new(0, 0));
        assert_eq!(grid.goal(), Coord::new(2, 1));
        assert_eq!(grid.role(Coord::new(2, 0)), Some(CellRole::Trap));
        assert!(grid.role(Coord::new(0, 1)).unwrap().blocks_movement());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Grid::from_ascii(&["S..", ".G"]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = Grid::from_ascii(&["S?G"]).unwrap_err();
        assert!(matches!(err, MazeError::InvalidMap(msg) if msg.contains('?')));
    }

    #[test]
    fn test_record_out_of_bounds_trap() {
        let map = MapDescription {
            name: "bad".to_string(),
            description: String::new(),
            layout: MapLayout::Record {
                width: 3,
                height: 3,
                start: Coord::new(0, 0),
                goal: Coord::new(2, 2),
                traps: vec![Coord::new(3, 0)],
                obstacles: Vec::new(),
            },
        };
        assert!(matches!(
            map.to_grid(),
            Err(MazeError::OutOfBounds { x: 3, y: 0, .. })
        ));
    }

    #[test]
    fn test_record_trap_on_goal_rejected() {
        let map = MapDescription {
            name: "bad".to_string(),
            description: String::new(),
            layout: MapLayout::Record {
                width: 3,
                height: 3,
                start: Coord::new(0, 0),
                goal: Coord::new(2, 2),
                traps: vec![Coord::new(2, 2)],
                obstacles: Vec::new(),
            },
        };
        assert!(matches!(map.to_grid(), Err(MazeError::InvalidMap(_))));
    }

    #[test]
    fn test_record_zero_area() {
        assert!(matches!(
            MapDescription::open(0, 4).to_grid(),
            Err(MazeError::EmptyGrid)
        ));
    }

    #[test]
    fn test_record_too_large() {
        let json = r#"{"name":"huge","layout":{"Record":{"width":4294967295,"height":4294967295,"start":{"x":0,"y":0},"goal":{"x":1,"y":0}}}}"#;
        let map = MapDescription::from_json_str(json).unwrap();
        assert!(matches!(map.to_grid(), Err(MazeError::InvalidMap(_))));

        assert!(matches!(
            MapDescription::open(4096, 4096).to_grid(),
            Err(MazeError::InvalidMap(_))
        ));
    }

    #[test]
    fn test_parse_from_ron() {
        let ron = r#"
            MapDescription(
                name: "Test",
                layout: Record(
                    width: 4,
                    height: 2,
                    start: (x: 0, y: 0),
                    goal: (x: 3, y: 1),
                    traps: [(x: 1, y: 0)],
                ),
            )
        "#;
        let map = MapDescription::from_ron_str(ron).unwrap();
        assert_eq!(map.name, "Test");
        let grid = map.to_grid().unwrap();
        assert_eq!(grid.traps(), vec![Coord::new(1, 0)]);
    }

    #[test]
    fn test_parse_layout_from_json() {
        let json = r##"{
            "name": "json",
            "layout": {"Layout": {"rows": ["S#", ".G"], "legend": {}}}
        }"##;
        let map = MapDescription::from_json_str(json).unwrap();
        let grid = map.to_grid().unwrap();
        assert_eq!(grid.obstacles(), vec![Coord::new(1, 0)]);
    }

    #[test]
    fn test_ron_string_round_trip() {
        let map = MapDescription::classroom();
        let text = map.to_ron_string().unwrap();
        assert_eq!(MapDescription::from_ron_str(&text).unwrap(), map);
    }

    #[test]
    fn test_presets() {
        assert!(MapDescription::preset("classroom").is_some());
        assert!(MapDescription::preset("open").is_some());
        assert!(MapDescription::preset("missing").is_none());
    }
}
