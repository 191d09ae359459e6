//! Error types for ompwatch
//!
//! Uses `thiserror` for library errors; the binary boundary wraps these in
//! `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ompwatch operations
pub type OmpwatchResult<T> = Result<T, OmpwatchError>;

/// Main error type for ompwatch operations
#[derive(Error, Debug)]
pub enum OmpwatchError {
    /// Config file is missing entirely
    #[error("config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Config file exists but could not be parsed or is missing keys
    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A directory named in the config does not exist
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Server executable is missing from the server directory
    #[error("server executable not found: {path}")]
    ExecutableNotFound { path: PathBuf },

    /// Server process could not be started
    #[error("failed to launch server '{path}': {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A watched file could not be copied into the server
    #[error("failed to copy '{file}': {source}")]
    Sync {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem watch source failed (e.g. watch directory removed)
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OmpwatchError {
    /// Sync errors are the only recoverable class: the watch loop logs them
    /// and keeps running. Everything else aborts.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, OmpwatchError::Sync { .. })
    }
}
