//! Map file validation.
//!
//! A map is valid when it parses, normalizes into a grid and its goal is
//! either reachable or provably cut off. Unreachable goals are reported, not
//! rejected: a "no way through" map is a legitimate lesson.

use std::path::{Path, PathBuf};

use maze_core::error::MazeError;
use maze_core::grid::Grid;
use maze_core::map::MapDescription;
use maze_core::pathfinding::find_route;
use thiserror::Error;

/// Validation failure for a single file or directory.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// A map file failed to load or normalize.
    #[error("{path}: {source}")]
    Map {
        /// Offending file.
        path: PathBuf,
        /// Underlying core error.
        #[source]
        source: MazeError,
    },

    /// The directory holds no map files.
    #[error("No .ron or .json map files in {0}")]
    NoMaps(PathBuf),

    /// The directory could not be listed.
    #[error("Cannot read {path}: {source}")]
    Io {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// What validation learned about one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapReport {
    /// File the map came from.
    pub path: PathBuf,
    /// Map name from the description.
    pub name: String,
    /// Grid width.
    pub width: u32,
    /// Grid height.
    pub height: u32,
    /// Number of trap cells.
    pub traps: usize,
    /// Length of the shortest safe route, `None` if the goal is cut off.
    pub shortest_route: Option<usize>,
}

impl std::fmt::Display for MapReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}x{}, {} traps): ",
            self.name, self.width, self.height, self.traps
        )?;
        match self.shortest_route {
            Some(len) => write!(f, "shortest route {len} moves"),
            None => write!(f, "goal unreachable"),
        }
    }
}

/// Load a map file and normalize it into a grid.
///
/// # Errors
///
/// Returns [`ValidateError::Map`] if the file cannot be read, parsed or
/// normalized.
pub fn load_grid(path: &Path) -> Result<(MapDescription, Grid), ValidateError> {
    let wrap = |source| ValidateError::Map {
        path: path.to_path_buf(),
        source,
    };
    let map = MapDescription::load(path).map_err(wrap)?;
    let grid = map.to_grid().map_err(wrap)?;
    Ok((map, grid))
}

/// Validate a single map file.
///
/// # Errors
///
/// See [`load_grid`].
pub fn validate_map(path: &Path) -> Result<MapReport, ValidateError> {
    let (map, grid) = load_grid(path)?;
    let route = find_route(&grid).map_err(|source| ValidateError::Map {
        path: path.to_path_buf(),
        source,
    })?;
    let report = MapReport {
        path: path.to_path_buf(),
        name: map.name,
        width: grid.width(),
        height: grid.height(),
        traps: grid.traps().len(),
        shortest_route: route.map(|p| p.len()),
    };
    tracing::debug!(path = %path.display(), route = ?report.shortest_route, "Validated map");
    Ok(report)
}

/// Validate every `.ron` and `.json` file in a directory, in name order.
///
/// # Errors
///
/// Fails on the first invalid map, or if the directory has no maps.
pub fn validate_data_directory(path: &Path) -> Result<Vec<MapReport>, ValidateError> {
    let io_error = |source| ValidateError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut files: Vec<PathBuf> = std::fs::read_dir(path)
        .map_err(io_error)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_map_file(p))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(ValidateError::NoMaps(path.to_path_buf()));
    }
    files.iter().map(|file| validate_map(file)).collect()
}

/// Validate a file, or every map in a directory.
///
/// # Errors
///
/// See [`validate_map`] and [`validate_data_directory`].
pub fn validate_path(path: &Path) -> Result<Vec<MapReport>, ValidateError> {
    if path.is_dir() {
        validate_data_directory(path)
    } else {
        validate_map(path).map(|report| vec![report])
    }
}

fn is_map_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext, "ron" | "json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    const CORRIDOR: &str = r#"MapDescription(name: "corridor", layout: Layout(rows: ["S..G"]))"#;

    #[test]
    fn test_validate_single_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "corridor.ron", CORRIDOR);

        let report = validate_map(&path).unwrap();
        assert_eq!(report.name, "corridor");
        assert_eq!(report.shortest_route, Some(3));
        assert_eq!(report.to_string(), "corridor (4x1, 0 traps): shortest route 3 moves");
    }

    #[test]
    fn test_unreachable_goal_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "cut.ron",
            r#"MapDescription(name: "cut", layout: Layout(rows: ["S#G"]))"#,
        );
        let report = validate_map(&path).unwrap();
        assert_eq!(report.shortest_route, None);
        assert!(report.to_string().ends_with("goal unreachable"));
    }

    #[test]
    fn test_invalid_map_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "two_starts.ron",
            r#"MapDescription(name: "bad", layout: Layout(rows: ["SSG"]))"#,
        );
        let err = validate_map(&path).unwrap_err();
        assert!(err.to_string().contains("two_starts.ron"));
    }

    #[test]
    fn test_directory_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.ron", CORRIDOR);
        write(dir.path(), "a.ron", CORRIDOR);
        write(dir.path(), "notes.txt", "not a map");

        let reports = validate_data_directory(dir.path()).unwrap();
        let names: Vec<_> = reports
            .iter()
            .filter_map(|r| r.path.file_name())
            .collect();
        assert_eq!(names, vec!["a.ron", "b.ron"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            validate_data_directory(dir.path()),
            Err(ValidateError::NoMaps(_))
        ));
    }
}
