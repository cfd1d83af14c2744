use mongodb::options::ClientOptions;

use super::error::{MongoDaoError, MongoResult};

const DEFAULT_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "duck_arcade";
const DEFAULT_CONNECT_ATTEMPTS: u32 = 5;

/// Parsed client options plus the database holding the `kv` collection.
#[derive(Clone)]
pub struct MongoConfig {
    /// Driver options parsed from the connection URI.
    pub options: ClientOptions,
    /// Database holding the `kv` collection.
    pub database_name: String,
    /// Pings tried before giving up on a (re)connection; at least one.
    pub connect_attempts: u32,
}

impl MongoConfig {
    /// Parse `uri`, targeting `db_name` or `duck_arcade`.
    pub async fn from_uri(uri: &str, db_name: Option<&str>) -> MongoResult<Self> {
        let options = ClientOptions::parse(uri)
            .await
            .map_err(|source| MongoDaoError::InvalidUri {
                uri: uri.to_owned(),
                source,
            })?;

        Ok(Self {
            options,
            database_name: db_name.unwrap_or(DEFAULT_DATABASE).to_owned(),
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
        })
    }

    /// Override how many pings a (re)connection tries.
    pub fn with_connect_attempts(mut self, attempts: u32) -> Self {
        self.connect_attempts = attempts.max(1);
        self
    }

    /// Read `MONGO_URI` and `MONGO_DB`, falling back to a local server and the default database.
    pub async fn from_env() -> MongoResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok()).await
    }

    /// Same as [`MongoConfig::from_env`] with variables resolved by `lookup`. Blank values count as unset.
    pub async fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> MongoResult<Self> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let uri = var("MONGO_URI").unwrap_or_else(|| DEFAULT_URI.to_owned());
        Self::from_uri(&uri, var("MONGO_DB").as_deref()).await
    }
}
