//! Error types shared by the REST key-value implementation.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`RestDaoError`] failures.
pub type RestResult<T> = Result<T, RestDaoError>;

/// Failures that can occur while talking to the KV REST endpoint.
#[derive(Debug, Error)]
pub enum RestDaoError {
    /// Required environment variable is missing.
    #[error("missing KV REST environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the variable.
        var: &'static str,
    },
    /// The configured endpoint is not a usable base URL.
    #[error("invalid KV REST endpoint `{url}`")]
    InvalidUrl {
        /// Endpoint as configured.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The configured endpoint cannot carry path segments (e.g. `mailto:`).
    #[error("KV REST endpoint `{url}` cannot be used as a base URL")]
    CannotBeABase {
        /// Endpoint as configured.
        url: String,
    },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build KV REST client")]
    ClientBuilder {
        /// Client builder failure.
        #[source]
        source: reqwest::Error,
    },
    /// A request to the endpoint could not be sent.
    #[error("failed to send KV REST `{command}` request")]
    RequestSend {
        /// Redis command.
        command: &'static str,
        /// Transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// The endpoint answered with an unexpected status code.
    #[error("unexpected KV REST status {status} for `{command}`: {message}")]
    RequestStatus {
        /// Redis command.
        command: &'static str,
        /// Status received.
        status: StatusCode,
        /// Response body, when readable.
        message: String,
    },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode KV REST response for `{command}`")]
    DecodeResponse {
        /// Redis command.
        command: &'static str,
        /// Decoding failure.
        #[source]
        source: reqwest::Error,
    },
    /// The stored string under `key` is not valid JSON.
    #[error("failed to deserialize KV value stored under `{key}`")]
    DeserializeValue {
        /// Store key.
        key: String,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// The endpoint answered 2xx but reported a command error.
    #[error("KV REST `{command}` failed: {message}")]
    Command {
        /// Redis command.
        command: &'static str,
        /// Error reported by the endpoint.
        message: String,
    },
}
