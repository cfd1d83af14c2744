use url::Url;

use super::error::{CouchDaoError, CouchResult};

/// Database used when `COUCH_DB` is not provided.
const DEFAULT_DATABASE: &str = "duck_arcade";

/// Basic-auth pair sent with every CouchDB request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouchCredentials {
    /// CouchDB user.
    pub username: String,
    /// Password of [`CouchCredentials::username`].
    pub password: String,
}

/// Where the key-value documents live: server URL, database and optional credentials.
#[derive(Debug, Clone)]
pub struct CouchConfig {
    /// Server root; database and document segments are appended to its path.
    pub base_url: Url,
    /// Database holding one document per key.
    pub database: String,
    /// Credentials, when the server requires them.
    pub credentials: Option<CouchCredentials>,
}

impl CouchConfig {
    /// Parse `base_url` and target `database` without credentials.
    pub fn new(base_url: &str, database: impl Into<String>) -> CouchResult<Self> {
        let parsed = Url::parse(base_url).map_err(|source| CouchDaoError::InvalidUrl {
            url: base_url.to_owned(),
            source,
        })?;
        if parsed.cannot_be_a_base() {
            return Err(CouchDaoError::CannotBeABase {
                url: base_url.to_owned(),
            });
        }

        Ok(Self {
            base_url: parsed,
            database: database.into(),
            credentials: None,
        })
    }

    /// Attach basic-auth credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(CouchCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Read `COUCH_BASE_URL`, `COUCH_DB`, `COUCH_USERNAME` and `COUCH_PASSWORD`.
    pub fn from_env() -> CouchResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`CouchConfig::from_env`] with variables resolved by `lookup`.
    ///
    /// Blank values count as unset; credentials are only used when both halves are set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CouchResult<Self> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let base_url = var("COUCH_BASE_URL").ok_or(CouchDaoError::MissingEnvVar {
            var: "COUCH_BASE_URL",
        })?;
        let database = var("COUCH_DB").unwrap_or_else(|| DEFAULT_DATABASE.to_owned());
        let config = Self::new(&base_url, database)?;

        Ok(match (var("COUCH_USERNAME"), var("COUCH_PASSWORD")) {
            (Some(username), Some(password)) => config.with_credentials(username, password),
            _ => config,
        })
    }
}
