use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by shot-stats.
///
/// Only folder-level problems surface here. Unreadable photos and malformed
/// metadata values are recovered where they occur and never become errors.
#[derive(Error, Debug)]
pub enum ShotStatsError {
    /// The folder to analyse does not exist.
    #[error("Folder not found: {0}")]
    FolderNotFound(PathBuf),

    /// The path exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The folder exists but its entries could not be listed.
    #[error("Failed to read folder {path}: {source}")]
    FolderUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Chart data or the settings file could not be written.
    #[error("Failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be produced or parsed.
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The worker pool for parallel metadata reading could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A required setting is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the shot-stats crates.
pub type Result<T> = std::result::Result<T, ShotStatsError>;
