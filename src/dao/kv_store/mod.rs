/// CouchDB backend, one document per key.
#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;
/// MongoDB backend, one document per key in the `kv` collection.
#[cfg(feature = "mongo-store")]
pub mod mongodb;
/// Redis-over-REST backend (Vercel KV / Upstash).
pub mod rest;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::dao::storage::StorageResult;

/// Abstraction over the shared key-value store holding leaderboards and the news cache.
///
/// Values are opaque JSON documents owned by their key. Backends give no transactional
/// guarantee across a `get` followed by a `set`.
pub trait KvStore: Send + Sync {
    /// Value stored under `key`, `None` when the key was never written.
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<Value>>>;
    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: Value) -> BoxFuture<'static, StorageResult<()>>;
    /// Cheap round-trip proving the backend still answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
