//! Tracing setup for the terminal host.
//!
//! The renderer owns stdout, so log lines go to a file or nowhere.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::filter::EnvFilter;

use crate::error::GameError;

/// Install a global `fmt` subscriber appending to `path`, filtered by
/// `RUST_LOG` (default `info`).
pub fn init_file_logging(path: &Path) -> Result<(), GameError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| GameError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    tracing::info!(path = %path.display(), "logging initialised");
    Ok(())
}
