use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::style::Color;
use ratatui::symbols::border;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Directory name used under the platform config and data directories.
pub const APP_DIR_NAME: &str = "grid-snake";

const CONFIG_FILE_NAME: &str = "config.json";
const LOG_FILE_NAME: &str = "grid-snake.log";

/// Reference board height in cells.
pub const DEFAULT_ROWS: u16 = 30;

/// Reference board width in cells.
pub const DEFAULT_COLS: u16 = 50;

/// Largest accepted board side.
pub const MAX_BOARD_SIDE: u16 = 1000;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 10;

/// Number of cells in the starting snake, laid out along row 0.
pub const INITIAL_SNAKE_LENGTH: usize = 5;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct GridSize {
    pub rows: u16,
    pub cols: u16,
}

impl GridSize {
    /// The 30x50 board the game is tuned for.
    pub const REFERENCE: Self = Self {
        rows: DEFAULT_ROWS,
        cols: DEFAULT_COLS,
    };

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.rows) * usize::from(self.cols)
    }
}

/// Fixed palette for board elements.
#[derive(Debug)]
pub struct Palette {
    pub snake: Color,
    pub food: Color,
    pub empty: Color,
    pub border: Color,
    pub border_won: Color,
    pub border_lost: Color,
    pub hud_text: Color,
    pub hud_muted: Color,
}

pub const PALETTE: Palette = Palette {
    snake: Color::White,
    food: Color::Blue,
    empty: Color::Black,
    border: Color::Gray,
    border_won: Color::Green,
    border_lost: Color::Red,
    hud_text: Color::White,
    hud_muted: Color::DarkGray,
};

/// Half-block border set: solid side faces the play area.
pub const BORDER_HALF_BLOCK: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

/// Upper half-block glyph; fg paints the upper row, bg the lower one.
pub const GLYPH_HALF_UPPER: &str = "▀";

/// Runtime settings, layered as defaults <- config file <- CLI flags.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub rows: u16,
    pub cols: u16,
    pub tick_interval_ms: u64,
    /// Fixed RNG seed for reproducible food placement.
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

/// Values given on the command line; `None` keeps the lower layer.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SettingsOverrides {
    pub rows: Option<u16>,
    pub cols: Option<u16>,
    pub tick_interval_ms: Option<u64>,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            seed: None,
            log_file: None,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from the default config location.
    ///
    /// A missing default file yields [`Settings::default`]. A missing file
    /// that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_fallback(path, default_config_path().as_deref())
    }

    fn load_with_fallback(
        explicit: Option<&Path>,
        fallback: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        match (explicit, fallback) {
            (Some(path), _) => Self::load_from_path(path),
            (None, Some(path)) if path.exists() => Self::load_from_path(path),
            (None, _) => Ok(Self::default()),
        }
    }

    /// Applies command-line values on top of file and default values.
    pub fn apply_overrides(&mut self, overrides: SettingsOverrides) {
        if let Some(rows) = overrides.rows {
            self.rows = rows;
        }
        if let Some(cols) = overrides.cols {
            self.cols = cols;
        }
        if let Some(tick_interval_ms) = overrides.tick_interval_ms {
            self.tick_interval_ms = tick_interval_ms;
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(log_file) = overrides.log_file {
            self.log_file = Some(log_file);
        }
    }

    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw, path)
    }

    /// Parses settings from JSON text; `origin` is only used in errors.
    pub fn from_json(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Checks that the board can host the starting snake plus one food cell,
    /// and that the tick interval is not below the minimum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let min_cols = u16::try_from(INITIAL_SNAKE_LENGTH).unwrap_or(u16::MAX);
        if self.rows < 1
            || self.cols < min_cols
            || self.rows > MAX_BOARD_SIDE
            || self.cols > MAX_BOARD_SIDE
        {
            return Err(ConfigError::BoardSize {
                rows: self.rows,
                cols: self.cols,
                min_cols,
                max: MAX_BOARD_SIDE,
            });
        }

        if self.grid_size().total_cells() <= INITIAL_SNAKE_LENGTH {
            return Err(ConfigError::NoRoomForFood {
                rows: self.rows,
                cols: self.cols,
            });
        }

        if self.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(ConfigError::TickTooShort {
                actual: self.tick_interval_ms,
                min: MIN_TICK_INTERVAL_MS,
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        GridSize {
            rows: self.rows,
            cols: self.cols,
        }
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Returns the configured log file, falling back to the platform data dir.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(default_log_path)
    }
}

/// Returns the platform-correct config file path, when one exists.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Returns the platform-correct log file path.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}

/// Writes settings as pretty JSON, creating parent directories when needed.
pub fn write_settings(path: &Path, settings: &Settings) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(settings)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;

    fs::write(path, json)
}
