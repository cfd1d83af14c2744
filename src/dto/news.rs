use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::{NewsCacheEntry, NewsItem};

/// Headline served by the news endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NewsHeadline {
    /// Headline text.
    pub title: String,
    /// Article URL.
    pub link: String,
    /// Publication date exactly as the feed wrote it.
    pub date: String,
    /// Publisher name.
    pub source: String,
}

impl From<NewsItem> for NewsHeadline {
    fn from(item: NewsItem) -> Self {
        Self {
            title: item.title,
            link: item.link,
            date: item.date,
            source: item.source,
        }
    }
}

/// News endpoint payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    /// Cached headlines, newest feed order.
    pub items: Vec<NewsHeadline>,
    /// Epoch milliseconds of the refresh that produced `items`; null when nothing is cached.
    pub updated_at: Option<i64>,
    /// Present when a refresh failed and an older cache entry is served instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale: Option<bool>,
}

impl NewsResponse {
    /// Serve a cache entry as-is.
    pub fn fresh(entry: NewsCacheEntry) -> Self {
        Self {
            items: entry.items.into_iter().map(Into::into).collect(),
            updated_at: entry.updated_at,
            stale: None,
        }
    }

    /// Serve a cache entry that could not be refreshed.
    pub fn stale(entry: NewsCacheEntry) -> Self {
        Self {
            stale: Some(true),
            ..Self::fresh(entry)
        }
    }

    /// Nothing cached and nothing fetched.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            updated_at: None,
            stale: None,
        }
    }
}
