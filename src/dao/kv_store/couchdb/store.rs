use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::dao::{kv_store::KvStore, storage::StorageResult};

use super::{
    config::{CouchConfig, CouchCredentials},
    error::{CouchDaoError, CouchResult},
    models::CouchKvDocument,
};

/// Attempts per write; a concurrent update between the revision read and the PUT costs one retry.
const WRITE_ATTEMPTS: u32 = 2;

/// [`KvStore`] keeping each key in its own CouchDB document.
#[derive(Clone)]
pub struct CouchKvStore {
    client: Client,
    base_url: Arc<Url>,
    database: Arc<str>,
    credentials: Option<Arc<CouchCredentials>>,
}

impl CouchKvStore {
    /// Build the client and create the database when it does not exist yet.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let store = Self {
            client,
            base_url: Arc::new(config.base_url),
            database: Arc::from(config.database),
            credentials: config.credentials.map(Arc::new),
        };

        store.ensure_database().await?;
        Ok(store)
    }

    fn url_with(&self, segments: &[&str]) -> CouchResult<Url> {
        let mut url = Url::clone(&self.base_url);
        url.path_segments_mut()
            .map_err(|_| CouchDaoError::CannotBeABase {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .push(&self.database)
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.credentials.as_deref() {
            Some(credentials) => {
                builder.basic_auth(&credentials.username, Some(&credentials.password))
            }
            None => builder,
        }
    }

    async fn database_request(&self, method: Method) -> CouchResult<StatusCode> {
        let response = self
            .request(method, self.url_with(&[])?)
            .send()
            .await
            .map_err(|source| CouchDaoError::DatabaseRequest {
                database: self.database.to_string(),
                source,
            })?;
        Ok(response.status())
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let status = match self.database_request(Method::GET).await? {
            StatusCode::NOT_FOUND => {
                debug!(database = %self.database, "creating CouchDB database");
                self.database_request(Method::PUT).await?
            }
            status => status,
        };

        // 412: created concurrently by another instance.
        if status.is_success() || status == StatusCode::PRECONDITION_FAILED {
            Ok(())
        } else {
            Err(self.database_status(status))
        }
    }

    async fn ping(&self) -> CouchResult<()> {
        let status = self.database_request(Method::GET).await?;
        if status.is_success() {
            Ok(())
        } else {
            Err(self.database_status(status))
        }
    }

    fn database_status(&self, status: StatusCode) -> CouchDaoError {
        CouchDaoError::DatabaseStatus {
            database: self.database.to_string(),
            status,
        }
    }

    async fn get_document(&self, key: &str) -> CouchResult<Option<CouchKvDocument>> {
        let response = self
            .request(Method::GET, self.url_with(&[key])?)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                key: key.to_owned(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<CouchKvDocument>()
                .await
                .map(Some)
                .map_err(|source| CouchDaoError::DecodeResponse {
                    key: key.to_owned(),
                    source,
                }),
            status => Err(CouchDaoError::RequestStatus {
                key: key.to_owned(),
                status,
            }),
        }
    }

    /// Replace the document for `key`, based on its current revision.
    async fn put_value(&self, key: &str, value: Value) -> CouchResult<()> {
        let mut attempt = 1;
        loop {
            let rev = self.get_document(key).await?.and_then(|doc| doc.rev);
            let document = CouchKvDocument::new(key, value.clone(), rev);

            let response = self
                .request(Method::PUT, self.url_with(&[key])?)
                .json(&document)
                .send()
                .await
                .map_err(|source| CouchDaoError::RequestSend {
                    key: key.to_owned(),
                    source,
                })?;

            match response.status() {
                status if status.is_success() => return Ok(()),
                StatusCode::CONFLICT if attempt < WRITE_ATTEMPTS => {
                    debug!(key, attempt, "CouchDB revision conflict; retrying write");
                    attempt += 1;
                }
                status => {
                    return Err(CouchDaoError::RequestStatus {
                        key: key.to_owned(),
                        status,
                    });
                }
            }
        }
    }
}

impl KvStore for CouchKvStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<Value>>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move {
            let document = store.get_document(&key).await?;
            Ok(document.map(|doc| doc.value))
        })
    }

    fn set(&self, key: &str, value: Value) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.put_value(&key, value).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }
}
