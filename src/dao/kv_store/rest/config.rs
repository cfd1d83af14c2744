use super::error::{RestDaoError, RestResult};

/// Runtime configuration describing how to reach a Redis-over-REST endpoint
/// (Vercel KV / Upstash).
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Endpoint root; commands are appended as path segments.
    pub url: String,
    /// Bearer token.
    pub token: String,
}

impl RestConfig {
    /// Construct a configuration from an explicit endpoint and bearer token.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
        }
    }

    /// Build a configuration by reading the variables Vercel injects for a linked KV database.
    pub fn from_env() -> RestResult<Self> {
        let url = std::env::var("KV_REST_API_URL").map_err(|_| RestDaoError::MissingEnvVar {
            var: "KV_REST_API_URL",
        })?;
        let token =
            std::env::var("KV_REST_API_TOKEN").map_err(|_| RestDaoError::MissingEnvVar {
                var: "KV_REST_API_TOKEN",
            })?;

        Ok(Self::new(url, token))
    }
}
