use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::dao::{kv_store::KvStore, storage::StorageResult};

use super::{
    config::RestConfig,
    error::{RestDaoError, RestResult},
};

/// Envelope returned by every Redis-over-REST command.
#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// [`KvStore`] speaking the Redis REST protocol used by Vercel KV and Upstash.
///
/// Values are written as JSON strings and parsed back on read, matching what the
/// JavaScript KV client stores.
#[derive(Clone)]
pub struct RestKvStore {
    client: Client,
    base_url: Arc<Url>,
    token: Arc<str>,
}

impl RestKvStore {
    /// Build the client and make sure the endpoint answers a `PING`.
    pub async fn connect(config: RestConfig) -> RestResult<Self> {
        let base_url = Url::parse(&config.url).map_err(|source| RestDaoError::InvalidUrl {
            url: config.url.clone(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(RestDaoError::CannotBeABase { url: config.url });
        }

        let client = Client::builder()
            .build()
            .map_err(|source| RestDaoError::ClientBuilder { source })?;

        let store = Self {
            client,
            base_url: Arc::new(base_url),
            token: Arc::from(config.token),
        };

        store.ping().await?;
        Ok(store)
    }

    fn command_url(&self, segments: &[&str]) -> RestResult<Url> {
        let mut url = Url::clone(&self.base_url);
        url.path_segments_mut()
            .map_err(|_| RestDaoError::CannotBeABase {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, command: &'static str, builder: RequestBuilder) -> RestResult<Option<Value>> {
        let response = builder
            .bearer_auth(self.token.as_ref())
            .send()
            .await
            .map_err(|source| RestDaoError::RequestSend { command, source })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RestDaoError::RequestStatus {
                command,
                status,
                message,
            });
        }

        let payload = response
            .json::<CommandResponse>()
            .await
            .map_err(|source| RestDaoError::DecodeResponse { command, source })?;

        match payload.error {
            Some(message) => Err(RestDaoError::Command { command, message }),
            None => Ok(payload.result),
        }
    }

    async fn ping(&self) -> RestResult<()> {
        let url = self.command_url(&["ping"])?;
        self.send("ping", self.client.get(url)).await.map(|_| ())
    }

    async fn get_value(&self, key: &str) -> RestResult<Option<Value>> {
        let url = self.command_url(&["get", key])?;
        match self.send("get", self.client.get(url)).await? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => serde_json::from_str(&raw).map(Some).map_err(|source| {
                RestDaoError::DeserializeValue {
                    key: key.to_owned(),
                    source,
                }
            }),
            Some(other) => Ok(Some(other)),
        }
    }

    async fn set_value(&self, key: &str, value: &Value) -> RestResult<()> {
        let url = self.command_url(&["set", key])?;
        let builder = self.client.post(url).body(value.to_string());
        self.send("set", builder).await.map(|_| ())
    }
}

impl KvStore for RestKvStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<Value>>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.get_value(&key).await.map_err(Into::into) })
    }

    fn set(&self, key: &str, value: Value) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.set_value(&key, &value).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        // The REST client is connectionless; a successful ping is all there is to restore.
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}
