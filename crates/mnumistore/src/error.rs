use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the store, the query engine and the mapper.
///
/// Every variant is distinguishable so the outer layer (REST handler, CLI)
/// can turn it into the right status or exit code.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid resource id: {0}")]
    InvalidIdentity(String),

    #[error("Invalid resource file name: {0}")]
    InvalidFilename(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete {}: {reason}", path.display())]
    Delete { path: PathBuf, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Version conflict on {id}: expected {expected}, found {actual}")]
    VersionConflict {
        id: String,
        expected: String,
        actual: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Dictionary error: {0}")]
    Dictionary(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn delete(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Delete {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for the errors a REST layer would report as a client mistake
    /// rather than a server failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidIdentity(_)
                | StoreError::InvalidFilename(_)
                | StoreError::NotFound(_)
                | StoreError::AlreadyExists(_)
                | StoreError::InvalidArgument(_)
                | StoreError::VersionConflict { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
