/// Key-value store abstraction and its backends.
pub mod kv_store;
/// Typed access to leaderboard records.
pub mod leaderboard;
/// Persisted record definitions.
pub mod models;
/// Typed access to the news cache entry.
pub mod news;
/// Storage error types shared by every backend.
pub mod storage;
