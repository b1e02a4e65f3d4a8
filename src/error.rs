//! Error types for the engine layer
//!
//! The scanner itself never fails; errors only arise around it, when
//! files are read and directories walked.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Path does not exist or is not a regular file
    #[error("No such file: {0}")]
    NoSuchFile(PathBuf),

    /// I/O error while reading a file or walking a directory
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid UTF-8
    #[error("Not UTF-8: {0}")]
    NotUtf8(PathBuf),
}

/// Result type alias for EngineError
pub type Result<T> = std::result::Result<T, EngineError>;
