use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{
    config::AppConfig, dao::kv_store::KvStore, error::ServiceError,
    services::news_feed::FeedSource,
};

/// Handle shared with every request.
pub type SharedState = Arc<AppState>;

/// Central application state: configuration, the installed storage backend and the
/// upstream news source. Requests share nothing else.
pub struct AppState {
    config: AppConfig,
    kv_store: RwLock<Option<Arc<dyn KvStore>>>,
    feed: Arc<dyn FeedSource>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig, feed: Arc<dyn FeedSource>) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            kv_store: RwLock::new(None),
            feed,
            degraded: degraded_tx,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Upstream news source.
    pub fn feed(&self) -> &Arc<dyn FeedSource> {
        &self.feed
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn kv_store(&self) -> Option<Arc<dyn KvStore>> {
        let guard = self.kv_store.read().await;
        guard.as_ref().cloned()
    }

    /// Current store, or [`ServiceError::Degraded`] when none is installed.
    pub async fn require_kv_store(&self) -> Result<Arc<dyn KvStore>, ServiceError> {
        self.kv_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new store implementation and leave degraded mode.
    pub async fn install_kv_store(&self, store: Arc<dyn KvStore>) {
        {
            let mut guard = self.kv_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_kv_store(&self) {
        {
            let mut guard = self.kv_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update the degraded flag, notifying watchers only when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }
}
