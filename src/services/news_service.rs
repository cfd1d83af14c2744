//! Cached news feed: serve fresh cache, refresh when expired, fall back to stale cache.

use std::time::Duration;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    dao::{models::NewsCacheEntry, news::NewsCacheRepository, storage::StorageError},
    dto::{epoch_millis, news::NewsResponse},
    error::ServiceError,
    services::news_feed::{FeedError, extract_items},
    state::SharedState,
};

/// Why a fresh answer could not be produced.
#[derive(Debug, Error)]
enum RefreshError {
    #[error(transparent)]
    Storage(#[from] ServiceError),
    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl From<StorageError> for RefreshError {
    fn from(err: StorageError) -> Self {
        RefreshError::Storage(err.into())
    }
}

/// Return the news items, refreshing the cache when it is older than the configured TTL.
///
/// Never fails: when the refresh cannot complete, the previous cache entry is served
/// marked stale, and without any cache an empty list is returned.
pub async fn latest_news(state: &SharedState, now: OffsetDateTime) -> NewsResponse {
    match fresh_or_refreshed(state, now).await {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "news refresh failed; falling back to cached items");
            stale_fallback(state).await
        }
    }
}

async fn repository(state: &SharedState) -> Result<NewsCacheRepository, ServiceError> {
    let store = state.require_kv_store().await?;
    Ok(NewsCacheRepository::new(store))
}

async fn fresh_or_refreshed(
    state: &SharedState,
    now: OffsetDateTime,
) -> Result<NewsResponse, RefreshError> {
    let repository = repository(state).await?;
    let now_ms = epoch_millis(now);

    if let Some(entry) = load_cached(&repository).await? {
        if is_fresh(&entry, now_ms, state.config().news.ttl) {
            return Ok(NewsResponse::fresh(entry));
        }
    }

    let raw = state.feed().fetch().await?;
    let entry = NewsCacheEntry {
        items: extract_items(&raw, state.config().news.max_items),
        updated_at: Some(now_ms),
    };
    repository.save(&entry).await?;

    info!(items = entry.items.len(), "news cache refreshed");
    Ok(NewsResponse::fresh(entry))
}

/// Current cache entry; one that no longer decodes counts as absent so the refresh
/// overwrites it.
async fn load_cached(
    repository: &NewsCacheRepository,
) -> Result<Option<NewsCacheEntry>, StorageError> {
    match repository.load().await {
        Err(err @ StorageError::Decode { .. }) => {
            warn!(error = %err, "news cache undecodable; refreshing");
            Ok(None)
        }
        other => other,
    }
}

async fn stale_fallback(state: &SharedState) -> NewsResponse {
    let cached = match repository(state).await {
        Ok(repository) => repository.load().await.map_err(ServiceError::from),
        Err(err) => Err(err),
    };

    match cached {
        Ok(Some(entry)) => NewsResponse::stale(entry),
        Ok(None) => NewsResponse::empty(),
        Err(err) => {
            warn!(error = %err, "news cache unreadable; serving empty list");
            NewsResponse::empty()
        }
    }
}

fn is_fresh(entry: &NewsCacheEntry, now_ms: i64, ttl: Duration) -> bool {
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    entry
        .updated_at
        .is_some_and(|updated_at| now_ms.saturating_sub(updated_at) < ttl_ms)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use futures::future::BoxFuture;
    use reqwest::StatusCode;
    use time::macros::datetime;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            kv_store::{KvStore, memory::MemoryKvStore},
            models::NewsItem,
        },
        services::news_feed::FeedSource,
        state::AppState,
    };

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    /// Feed returning a fixed body, or failing when `body` is `None`.
    struct FakeFeed {
        body: Mutex<Option<String>>,
        calls: AtomicUsize,
    }

    impl FakeFeed {
        fn new(body: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                body: Mutex::new(body.map(str::to_owned)),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FeedSource for FakeFeed {
        fn fetch(&self) -> BoxFuture<'static, Result<String, FeedError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let body = self.body.lock().unwrap().clone();
            Box::pin(async move {
                body.ok_or(FeedError::Status {
                    status: StatusCode::BAD_GATEWAY,
                })
            })
        }
    }

    fn now() -> OffsetDateTime {
        datetime!(2026-10-19 12:00:00 UTC)
    }

    fn cached_entry(age_ms: i64) -> NewsCacheEntry {
        NewsCacheEntry {
            items: vec![NewsItem {
                title: "Cached duck".into(),
                link: "https://example.com/cached".into(),
                date: String::new(),
                source: "Example".into(),
            }],
            updated_at: Some(epoch_millis(now()) - age_ms),
        }
    }

    async fn state_with(
        store: Option<MemoryKvStore>,
        feed: Arc<FakeFeed>,
    ) -> SharedState {
        let state = AppState::new(AppConfig::default(), feed);
        if let Some(store) = store {
            state.install_kv_store(Arc::new(store)).await;
        }
        state
    }

    async fn seed(store: &MemoryKvStore, entry: &NewsCacheEntry) {
        store
            .set("rubber-duck-news", serde_json::to_value(entry).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn fresh_cache_is_served_without_fetching() {
        let store = MemoryKvStore::new();
        seed(&store, &cached_entry(DAY_MS - 1)).await;
        let feed = FakeFeed::new(Some("<item><title>New duck</title></item>"));
        let state = state_with(Some(store), feed.clone()).await;

        let response = latest_news(&state, now()).await;

        assert_eq!(feed.calls(), 0);
        assert_eq!(response.items[0].title, "Cached duck");
        assert_eq!(response.stale, None);
    }

    #[tokio::test]
    async fn expired_cache_is_refreshed_and_persisted() {
        let store = MemoryKvStore::new();
        seed(&store, &cached_entry(DAY_MS)).await;
        let feed = FakeFeed::new(Some("<item><title>New duck</title></item>"));
        let state = state_with(Some(store.clone()), feed.clone()).await;

        let response = latest_news(&state, now()).await;

        assert_eq!(feed.calls(), 1);
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].title, "New duck");
        assert_eq!(response.updated_at, Some(epoch_millis(now())));

        let stored = store.get("rubber-duck-news").await.unwrap().unwrap();
        assert_eq!(stored["updatedAt"], epoch_millis(now()));
        assert_eq!(stored["items"][0]["title"], "New duck");
    }

    #[tokio::test]
    async fn undecodable_cache_is_refreshed_and_overwritten() {
        let store = MemoryKvStore::new();
        store
            .set(
                "rubber-duck-news",
                serde_json::json!({"items": [{"link": "x"}], "updatedAt": 0}),
            )
            .await
            .unwrap();
        let feed = FakeFeed::new(Some("<item><title>New duck</title></item>"));
        let state = state_with(Some(store.clone()), feed.clone()).await;

        let response = latest_news(&state, now()).await;

        assert_eq!(feed.calls(), 1);
        assert_eq!(response.items[0].title, "New duck");
        assert_eq!(response.stale, None);

        let stored = store.get("rubber-duck-news").await.unwrap().unwrap();
        assert_eq!(stored["items"][0]["title"], "New duck");
    }

    #[tokio::test]
    async fn missing_cache_triggers_refresh() {
        let feed = FakeFeed::new(Some("<rss></rss>"));
        let state = state_with(Some(MemoryKvStore::new()), feed.clone()).await;

        let response = latest_news(&state, now()).await;

        assert_eq!(feed.calls(), 1);
        assert!(response.items.is_empty());
        assert_eq!(response.updated_at, Some(epoch_millis(now())));
        assert_eq!(response.stale, None);
    }

    #[tokio::test]
    async fn failed_refresh_serves_stale_cache() {
        let store = MemoryKvStore::new();
        let entry = cached_entry(3 * DAY_MS);
        seed(&store, &entry).await;
        let state = state_with(Some(store), FakeFeed::new(None)).await;

        let response = latest_news(&state, now()).await;

        assert_eq!(response.stale, Some(true));
        assert_eq!(response.items[0].title, "Cached duck");
        assert_eq!(response.updated_at, entry.updated_at);
    }

    #[tokio::test]
    async fn failed_refresh_without_cache_is_empty() {
        let state = state_with(Some(MemoryKvStore::new()), FakeFeed::new(None)).await;

        let response = latest_news(&state, now()).await;

        assert_eq!(response, NewsResponse::empty());
    }

    #[tokio::test]
    async fn degraded_mode_is_empty_without_fetching() {
        let feed = FakeFeed::new(Some("<item><title>New duck</title></item>"));
        let state = state_with(None, feed.clone()).await;

        let response = latest_news(&state, now()).await;

        assert_eq!(feed.calls(), 0);
        assert_eq!(response, NewsResponse::empty());
    }

    #[test]
    fn entry_without_timestamp_is_never_fresh() {
        let entry = NewsCacheEntry {
            items: Vec::new(),
            updated_at: None,
        };
        assert!(!is_fresh(&entry, 0, Duration::from_secs(60)));
    }
}
