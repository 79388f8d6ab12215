use std::path::PathBuf;

use thiserror::Error;

/// Errors from the fallible edges of the game: configuration and logging
/// setup. The simulation itself never fails.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
