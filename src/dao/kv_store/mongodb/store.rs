use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use mongodb::{Client, Collection, Database, bson::doc};
use serde_json::Value;
use tokio::{sync::RwLock, time::sleep};
use tracing::warn;

use super::{
    config::MongoConfig,
    error::{MongoDaoError, MongoResult},
    models::{MongoKvDocument, key_filter},
};
use crate::dao::{kv_store::KvStore, storage::StorageResult};

const KV_COLLECTION_NAME: &str = "kv";
const FIRST_RETRY_DELAY: Duration = Duration::from_millis(250);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// [`KvStore`] storing one document per key in a MongoDB collection.
#[derive(Clone)]
pub struct MongoKvStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    database: RwLock<Database>,
    config: MongoConfig,
}

/// Open a client on the configured database and wait for a ping, doubling the delay between tries.
async fn open_database(config: &MongoConfig) -> MongoResult<Database> {
    let client = Client::with_options(config.options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(&config.database_name);
    let attempts = config.connect_attempts.max(1);

    let mut delay = FIRST_RETRY_DELAY;
    let mut attempt = 1;
    loop {
        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => return Ok(database),
            Err(source) if attempt >= attempts => {
                return Err(MongoDaoError::ConnectPing { attempts, source });
            }
            Err(err) => {
                warn!(attempt, error = %err, "MongoDB ping failed; retrying");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = self.database.read().await.clone();
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let database = open_database(&self.config).await?;
        *self.database.write().await = database;
        Ok(())
    }
}

impl MongoKvStore {
    /// Connect to MongoDB, retrying the initial ping per [`MongoConfig::connect_attempts`].
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let database = open_database(&config).await?;
        let inner = Arc::new(MongoInner {
            database: RwLock::new(database),
            config,
        });
        Ok(Self { inner })
    }

    async fn collection(&self) -> Collection<MongoKvDocument> {
        self.inner
            .database
            .read()
            .await
            .collection::<MongoKvDocument>(KV_COLLECTION_NAME)
    }

    async fn find_value(&self, key: &str) -> MongoResult<Option<Value>> {
        let document = self
            .collection()
            .await
            .find_one(key_filter(key))
            .await
            .map_err(|source| MongoDaoError::LoadKey {
                key: key.to_owned(),
                source,
            })?;

        Ok(document.map(|doc| doc.value))
    }

    async fn save_value(&self, key: &str, value: Value) -> MongoResult<()> {
        let document = MongoKvDocument::new(key, value);
        self.collection()
            .await
            .replace_one(key_filter(key), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveKey {
                key: key.to_owned(),
                source,
            })?;

        Ok(())
    }
}

impl KvStore for MongoKvStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<Value>>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.find_value(&key).await.map_err(Into::into) })
    }

    fn set(&self, key: &str, value: Value) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.save_value(&key, value).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
