//! Error types of the CouchDB key-value backend.

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias for CouchDB backend operations.
pub type CouchResult<T> = Result<T, CouchDaoError>;

/// Failures while talking to CouchDB.
#[derive(Debug, Error)]
pub enum CouchDaoError {
    /// Required environment variable is missing.
    #[error("missing CouchDB environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the variable.
        var: &'static str,
    },
    /// The server URL does not parse.
    #[error("invalid CouchDB URL `{url}`")]
    InvalidUrl {
        /// URL as configured.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The server URL cannot carry path segments (e.g. `mailto:`).
    #[error("CouchDB URL `{url}` cannot be used as a base")]
    CannotBeABase {
        /// URL as configured.
        url: String,
    },
    /// Building the HTTP client failed.
    #[error("failed to build CouchDB client")]
    ClientBuilder {
        /// Client builder failure.
        #[source]
        source: reqwest::Error,
    },
    /// A database-level request could not be sent.
    #[error("failed to reach CouchDB database `{database}`")]
    DatabaseRequest {
        /// Database name.
        database: String,
        /// Transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// A database-level request answered an unexpected status.
    #[error("unexpected CouchDB status {status} for database `{database}`")]
    DatabaseStatus {
        /// Database name.
        database: String,
        /// Status received.
        status: StatusCode,
    },
    /// A document request could not be sent.
    #[error("failed to send CouchDB request for key `{key}`")]
    RequestSend {
        /// Store key.
        key: String,
        /// Transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// A document request answered an unexpected status.
    #[error("unexpected CouchDB status {status} for key `{key}`")]
    RequestStatus {
        /// Store key.
        key: String,
        /// Status received.
        status: StatusCode,
    },
    /// A document body was not a key document.
    #[error("failed to decode CouchDB document for key `{key}`")]
    DecodeResponse {
        /// Store key.
        key: String,
        /// Decoding failure.
        #[source]
        source: reqwest::Error,
    },
}
