//! Error types for the navigation core.

use thiserror::Error;

/// Result type alias using [`MazeError`].
pub type Result<T> = std::result::Result<T, MazeError>;

/// Top-level error type for all navigation core errors.
///
/// "No route exists" is deliberately absent: the pathfinder reports it as
/// `Ok(None)` so callers handle it as a normal branch.
#[derive(Debug, Error)]
pub enum MazeError {
    /// Coordinate outside the grid.
    #[error("Coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Column of the offending coordinate.
        x: i64,
        /// Row of the offending coordinate.
        y: i64,
        /// Grid width in cells.
        width: u32,
        /// Grid height in cells.
        height: u32,
    },

    /// A path endpoint sits on an impassable cell.
    #[error("Endpoint ({x}, {y}) is on a blocking cell")]
    BlockedEndpoint {
        /// Column of the endpoint.
        x: u32,
        /// Row of the endpoint.
        y: u32,
    },

    /// Grid with zero width or height.
    #[error("Grid has zero area")]
    EmptyGrid,

    /// Map description violates a grid invariant.
    #[error("Invalid map: {0}")]
    InvalidMap(String),

    /// Oracle output contained a token that is not a direction.
    #[error("Invalid command token '{token}' at offset {offset}")]
    InvalidCommand {
        /// The rejected token.
        token: String,
        /// Byte offset of the token in the input.
        offset: usize,
    },

    /// Oracle output contained no usable direction at all.
    #[error("Command sequence is empty after validation")]
    EmptyCommands,

    /// A step was requested after the session reached a terminal outcome.
    #[error("Session is over; reset before issuing more moves")]
    SessionOver,

    /// Replaying a recording diverged from what was recorded.
    #[error("Replay diverged at step {index}")]
    ReplayMismatch {
        /// Index of the first diverging step.
        index: usize,
    },

    /// Filesystem failure while loading or saving.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize a data file.
    #[error("Failed to parse '{path}': {message}")]
    Parse {
        /// Path or source label of the data.
        path: String,
        /// Error message.
        message: String,
    },
}

impl MazeError {
    /// True for configuration mistakes in the map or the requested endpoints.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::OutOfBounds { .. }
                | Self::BlockedEndpoint { .. }
                | Self::EmptyGrid
                | Self::InvalidMap(_)
        )
    }

    pub(crate) fn invalid_map(message: impl Into<String>) -> Self {
        Self::InvalidMap(message.into())
    }

    pub(crate) fn parse(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
