//! Updater Error Types

use crate::engine::config::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Conditions that abort a run before any file is touched
#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("{} not found - run the updater from the server directory", .0.display())]
    NotAServerDirectory(PathBuf),

    #[error("Directory unavailable: {}: {source}", path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to hash {}: {source}", path.display())]
    Hash {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Update check failed: {0}")]
    UpdateCheckFailed(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, UpdaterError>;
