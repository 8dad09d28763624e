use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::board::Cell;

/// Failures while loading or validating [`crate::config::Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("board must be between 1x{min_cols} and {max}x{max} cells, got {rows}x{cols}")]
    BoardSize {
        rows: u16,
        cols: u16,
        min_cols: u16,
        max: u16,
    },

    #[error("a {rows}x{cols} board leaves no room for food next to the starting snake")]
    NoRoomForFood { rows: u16, cols: u16 },

    #[error("tick interval must be at least {min} ms, got {actual} ms")]
    TickTooShort { actual: u64, min: u64 },
}

/// Rejected snake or food layouts.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum LayoutError {
    #[error("snake must have at least one segment")]
    EmptySnake,

    #[error("snake segment {0} lies outside the board")]
    SegmentOutOfBounds(Cell),

    #[error("snake segment {0} appears more than once")]
    DuplicateSegment(Cell),

    #[error("food at {0} lies outside the board")]
    FoodOutOfBounds(Cell),

    #[error("food at {0} overlaps the snake")]
    FoodOnSnake(Cell),
}

/// Top-level error surfaced by the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("failed to open log file {}: {}", .path.display(), .source)]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("logging setup failed: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("I/O failed: {0}")]
    Io(#[from] io::Error),
}
