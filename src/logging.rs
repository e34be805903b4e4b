//! Run log: a `tracing` subscriber writing to a rotated file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{ChangelogError, Result};

pub const LOG_FILE_NAME: &str = "changelog-update.log";

/// Rotate the previous log and install the global subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. Returns the log path.
pub fn init(config: &LoggingConfig) -> Result<PathBuf> {
    let dir = config.log_directory();
    fs::create_dir_all(&dir)?;

    let path = dir.join(LOG_FILE_NAME);
    rotate(&path, config.keep)?;
    let file = File::create(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| ChangelogError::config(format!("Failed to initialise logging: {}", e)))?;

    Ok(path)
}

fn rotated_path(path: &Path, generation: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}", generation));
    PathBuf::from(name)
}

/// Shift `path` to `path.1`, `path.1` to `path.2` and so on, keeping at most
/// `keep` rotated copies.
pub fn rotate(path: &Path, keep: usize) -> Result<()> {
    if keep == 0 {
        if path.exists() {
            fs::remove_file(path)?;
        }
        return Ok(());
    }

    let oldest = rotated_path(path, keep);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }

    for generation in (1..keep).rev() {
        let from = rotated_path(path, generation);
        if from.exists() {
            fs::rename(&from, rotated_path(path, generation + 1))?;
        }
    }

    if path.exists() {
        fs::rename(path, rotated_path(path, 1))?;
    }
    Ok(())
}
