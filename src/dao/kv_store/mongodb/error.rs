//! Error types of the MongoDB key-value backend.

use mongodb::error::Error as MongoError;
use thiserror::Error;

/// Result alias for MongoDB backend operations.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures while talking to MongoDB.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// The connection URI does not parse.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// URI as configured.
        uri: String,
        /// Driver parse failure.
        #[source]
        source: MongoError,
    },
    /// The driver refused the parsed options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver failure.
        #[source]
        source: MongoError,
    },
    /// No ping succeeded while (re)connecting.
    #[error("MongoDB did not answer a ping after {attempts} attempt(s)")]
    ConnectPing {
        /// Pings tried.
        attempts: u32,
        /// Failure of the last ping.
        #[source]
        source: MongoError,
    },
    /// The periodic health ping failed.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver failure.
        #[source]
        source: MongoError,
    },
    /// Reading a key failed.
    #[error("failed to load key `{key}`")]
    LoadKey {
        /// Store key.
        key: String,
        /// Driver failure.
        #[source]
        source: MongoError,
    },
    /// Writing a key failed.
    #[error("failed to save key `{key}`")]
    SaveKey {
        /// Store key.
        key: String,
        /// Driver failure.
        #[source]
        source: MongoError,
    },
}
