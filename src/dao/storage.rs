use std::error::Error;
use thiserror::Error;

/// Result alias for key-value store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by key-value stores regardless of the underlying medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing medium could not be read or written.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// What was being attempted.
        message: String,
        /// Failure reported by the medium.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The medium was readable but its content could not be encoded or decoded.
    #[error("storage corrupted: {message}")]
    Corrupted {
        /// What was being attempted.
        message: String,
        /// Encoding failure.
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a corrupted-content error from a JSON failure.
    pub fn corrupted(message: String, source: serde_json::Error) -> Self {
        StorageError::Corrupted { message, source }
    }
}
