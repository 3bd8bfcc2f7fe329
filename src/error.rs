//! Error types for listing, searching and indexing

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Remote path does not exist
    #[error("path not found: {0}")]
    NotFound(String),

    /// Operation expected a directory
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Destination exists and the upload policy forbids replacing it
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Path is not a valid absolute remote path
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Returns true if the error means the path simply isn't there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Why a path pattern could not be resolved to exactly one remote path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveFailure {
    #[error("no matching path")]
    NoMatch,

    #[error("pattern matches {0} paths, expected one")]
    Ambiguous(usize),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Errors surfaced by the command layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot resolve '{pattern}': {reason}")]
    PathResolution {
        pattern: String,
        reason: ResolveFailure,
    },

    #[error("listing '{path}' failed: {source}")]
    RemoteListing {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to the terminal (or any output sink) failed
    #[error("error writing output: {0}")]
    Output(#[from] io::Error),

    #[error("upload failed: {0}")]
    Upload(#[source] StoreError),

    #[error("share failed: {0}")]
    Share(#[source] StoreError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn resolution(pattern: &str, reason: ResolveFailure) -> Self {
        Error::PathResolution {
            pattern: pattern.to_string(),
            reason,
        }
    }

    pub(crate) fn listing(path: &str, source: StoreError) -> Self {
        Error::RemoteListing {
            path: path.to_string(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for command-level operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for store backends
pub type StoreResult<T> = std::result::Result<T, StoreError>;
