//! Error types for the progress center.
//!
//! The group state machine itself never fails; these errors come from the
//! edges: loading templates and event scripts, and addressing groups by name.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for progress center operations.
pub type ProgressResult<T> = Result<T, ProgressError>;

/// Errors that can occur around the progress center.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// I/O error while reading a file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be parsed.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A message template is unusable.
    #[error("Invalid template '{key}': {message}")]
    InvalidTemplate { key: String, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// No group with this name exists.
    #[error("Unknown group: {name}")]
    UnknownGroup { name: String },
}

impl ProgressError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error with path context.
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
