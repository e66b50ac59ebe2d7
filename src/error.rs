//! Fatal error taxonomy
//!
//! Per-tick simulation never fails; everything here aborts the run.

use std::path::PathBuf;

/// Errors that end the process with a non-zero exit code
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Platform or subsystem failed to start
    #[error("failed to initialize platform: {0}")]
    Init(String),

    /// Image or font missing or malformed
    #[error("failed to load asset {path}: {reason}")]
    AssetLoad { path: PathBuf, reason: String },

    /// Frame submission failed mid-run
    #[error("failed to present frame: {0}")]
    Present(String),

    /// Settings file unreadable or invalid
    #[error("invalid configuration {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl GameError {
    pub fn asset(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        GameError::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
