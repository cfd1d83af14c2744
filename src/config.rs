//! Application-level configuration loading: leaderboard capacity and news feed settings.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "DUCK_ARCADE_BACK_CONFIG_PATH";

const DEFAULT_MAX_ENTRIES: usize = 20;
const DEFAULT_FEED_URL: &str = "https://news.google.com/rss/search";
const DEFAULT_FEED_QUERY: &str = "ラバーダック OR ラバー・ダック OR \"rubber duck\"";
const DEFAULT_NEWS_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_NEWS_MAX_ITEMS: usize = 10;
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Leaderboard sizing.
    pub leaderboard: LeaderboardConfig,
    /// News feed and cache settings.
    pub news: NewsConfig,
}

#[derive(Debug, Clone)]
/// Leaderboard sizing.
pub struct LeaderboardConfig {
    /// Number of records kept per board.
    pub max_entries: usize,
}

#[derive(Debug, Clone)]
/// Upstream feed and cache freshness settings.
pub struct NewsConfig {
    /// RSS search endpoint; the query and locale parameters are appended.
    pub feed_url: String,
    /// Search terms sent as `q`.
    pub query: String,
    /// Age after which the cached feed is refreshed before being served.
    pub ttl: Duration,
    /// Headlines kept per refresh.
    pub max_items: usize,
    /// Upper bound on one feed download.
    pub fetch_timeout: Duration,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        max_entries = app_config.leaderboard.max_entries,
                        news_ttl_secs = app_config.news.ttl.as_secs(),
                        "loaded config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    leaderboard: RawLeaderboard,
    #[serde(default)]
    news: RawNews,
}

#[derive(Debug, Default, Deserialize)]
struct RawLeaderboard {
    max_entries: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct RawNews {
    feed_url: Option<String>,
    query: Option<String>,
    ttl_secs: Option<u64>,
    max_items: Option<usize>,
    fetch_timeout_secs: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let news = value.news;
        Self {
            leaderboard: LeaderboardConfig {
                max_entries: value
                    .leaderboard
                    .max_entries
                    .filter(|max| *max > 0)
                    .unwrap_or(DEFAULT_MAX_ENTRIES),
            },
            news: NewsConfig {
                feed_url: news.feed_url.unwrap_or_else(|| DEFAULT_FEED_URL.into()),
                query: news.query.unwrap_or_else(|| DEFAULT_FEED_QUERY.into()),
                ttl: news
                    .ttl_secs
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_NEWS_TTL),
                max_items: news.max_items.unwrap_or(DEFAULT_NEWS_MAX_ITEMS),
                fetch_timeout: news
                    .fetch_timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_FETCH_TIMEOUT),
            },
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
