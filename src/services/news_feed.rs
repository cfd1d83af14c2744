//! Upstream RSS source and the tolerant item extraction applied to its text.

use std::sync::Arc;

use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use crate::{config::NewsConfig, dao::models::NewsItem};

/// Locale parameters sent with every feed search.
const FEED_LOCALE_PARAMS: [(&str, &str); 3] = [("hl", "ja"), ("gl", "JP"), ("ceid", "JP:ja")];

static ITEM_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<item>(.*?)</item>").unwrap());
static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<title>(.*?)</title>").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<link>(.*?)</link>").unwrap());
static PUB_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<pubDate>(.*?)</pubDate>").unwrap());
static SOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<source[^>]*>(.*?)</source>").unwrap());
static CDATA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").unwrap());

/// Failures while fetching the feed text.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The configured feed URL does not parse.
    #[error("invalid feed URL `{url}`")]
    InvalidUrl {
        /// URL as configured.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// Building the HTTP client failed.
    #[error("failed to build feed client")]
    ClientBuilder {
        /// Client builder failure.
        #[source]
        source: reqwest::Error,
    },
    /// The request failed or timed out.
    #[error("feed request failed")]
    Request {
        /// Transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// The feed answered a non-success status.
    #[error("feed fetch failed: {status}")]
    Status {
        /// Status received.
        status: StatusCode,
    },
    /// The body could not be read as text.
    #[error("failed to read feed body")]
    Body {
        /// Transport failure.
        #[source]
        source: reqwest::Error,
    },
}

/// Producer of raw feed text.
pub trait FeedSource: Send + Sync {
    /// Download the feed once.
    fn fetch(&self) -> BoxFuture<'static, Result<String, FeedError>>;
}

/// [`FeedSource`] downloading the configured RSS search over HTTP.
#[derive(Clone)]
pub struct HttpFeedSource {
    client: Client,
    url: Arc<Url>,
}

impl HttpFeedSource {
    /// Client for the configured search, with the query and locale parameters applied.
    pub fn new(config: &NewsConfig) -> Result<Self, FeedError> {
        let mut url = Url::parse(&config.feed_url).map_err(|source| FeedError::InvalidUrl {
            url: config.feed_url.clone(),
            source,
        })?;
        url.query_pairs_mut()
            .append_pair("q", &config.query)
            .extend_pairs(FEED_LOCALE_PARAMS);

        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|source| FeedError::ClientBuilder { source })?;

        Ok(Self {
            client,
            url: Arc::new(url),
        })
    }

    /// Fully qualified search URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch(&self) -> BoxFuture<'static, Result<String, FeedError>> {
        let client = self.client.clone();
        let url = Url::clone(&self.url);
        Box::pin(async move {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|source| FeedError::Request { source })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FeedError::Status { status });
            }

            response
                .text()
                .await
                .map_err(|source| FeedError::Body { source })
        })
    }
}

/// Pull at most `max_items` headlines out of loosely structured RSS text.
///
/// Missing or malformed sub-fields become empty strings; only items without a title
/// are skipped. Scanning stops as soon as `max_items` items are collected.
pub fn extract_items(xml: &str, max_items: usize) -> Vec<NewsItem> {
    let mut items = Vec::new();
    for block in ITEM_BLOCK.captures_iter(xml) {
        if items.len() >= max_items {
            break;
        }
        let block = block.get(1).map_or("", |m| m.as_str());

        let title = strip_cdata(first_capture(&TITLE, block));
        if title.is_empty() {
            continue;
        }

        items.push(NewsItem {
            title,
            link: first_capture(&LINK, block).trim().to_owned(),
            date: first_capture(&PUB_DATE, block).trim().to_owned(),
            source: strip_cdata(first_capture(&SOURCE, block)),
        });
    }
    items
}

fn first_capture<'a>(pattern: &Regex, text: &'a str) -> &'a str {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map_or("", |m| m.as_str())
}

fn strip_cdata(text: &str) -> String {
    CDATA.replace_all(text, "$1").trim().to_owned()
}
