/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Leaderboard reads and score submissions.
pub mod leaderboard_service;
/// Upstream RSS source and headline extraction.
pub mod news_feed;
/// Cached news with stale fallback.
pub mod news_service;
/// Pure ranking rules shared by every board.
pub mod ranking;
/// Storage connection supervisor with backoff and degraded mode.
pub mod storage_supervisor;
