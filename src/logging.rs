//! Tracing setup
//!
//! The terminal belongs to the game while it runs, so log lines go to a file.
//! `RUST_LOG` overrides the default filter.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "grid_snake=info";

/// Log file used when none is given: next to the score file
pub fn default_log_path(score_path: &Path) -> PathBuf {
    score_path.with_file_name("grid_snake.log")
}

/// Install a global subscriber appending plain-text lines to `path`
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {:?}", parent))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("Failed to install tracing subscriber: {err}"))
}
