//! Error type shared by the preference storage backends.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for preference storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by preference storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("failed to access preferences file `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The preferences could not be encoded or decoded as JSON.
    #[error("failed to encode preferences file `{path}`")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A previous writer panicked while holding the storage lock.
    #[error("preference storage lock poisoned")]
    Poisoned,
}

impl StorageError {
    /// Wrap an I/O failure for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
