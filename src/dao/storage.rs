use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or refused the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Backend error rendered for logs.
        message: String,
        /// Backend error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The stored value under `key` does not have the expected shape.
    #[error("stored value under `{key}` could not be decoded")]
    Decode {
        /// Store key.
        key: String,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// The value for `key` could not be turned into JSON.
    #[error("value for `{key}` could not be encoded")]
    Encode {
        /// Store key.
        key: String,
        /// Serialization failure.
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

    /// Construct a decoding error for the value stored under `key`.
    pub fn decode(key: impl Into<String>, source: serde_json::Error) -> Self {
        StorageError::Decode {
            key: key.into(),
            source,
        }
    }

    /// Construct an encoding error for the value about to be stored under `key`.
    pub fn encode(key: impl Into<String>, source: serde_json::Error) -> Self {
        StorageError::Encode {
            key: key.into(),
            source,
        }
    }
}
