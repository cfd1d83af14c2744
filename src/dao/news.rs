use std::sync::Arc;

use crate::dao::{
    kv_store::KvStore,
    models::NewsCacheEntry,
    storage::{StorageError, StorageResult},
};

const NEWS_CACHE_KEY: &str = "rubber-duck-news";

/// Typed access to the single news cache entry.
#[derive(Clone)]
pub struct NewsCacheRepository {
    store: Arc<dyn KvStore>,
}

impl NewsCacheRepository {
    /// Repository over `store`.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Cached entry; `None` when nothing was ever cached.
    pub async fn load(&self) -> StorageResult<Option<NewsCacheEntry>> {
        match self.store.get(NEWS_CACHE_KEY).await? {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StorageError::decode(NEWS_CACHE_KEY, source)),
        }
    }

    /// Replace the cached entry.
    pub async fn save(&self, entry: &NewsCacheEntry) -> StorageResult<()> {
        let value = serde_json::to_value(entry)
            .map_err(|source| StorageError::encode(NEWS_CACHE_KEY, source))?;
        self.store.set(NEWS_CACHE_KEY, value).await
    }
}
