use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::AppError;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "grid_snake=info";

/// Installs the global subscriber, appending plain-text lines to `path`.
///
/// The terminal belongs to the game screen, so nothing is written to stdout
/// or stderr while the game runs.
pub fn init(path: &Path) -> Result<(), AppError> {
    let file = open_log_file(path)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }))
        .try_init()?;

    Ok(())
}

fn open_log_file(path: &Path) -> Result<File, AppError> {
    let to_error = |source: io::Error| AppError::LogFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_error)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_error)
}
