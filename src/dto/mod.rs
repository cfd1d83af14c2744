use time::{OffsetDateTime, UtcOffset, macros::format_description};

/// Health check payloads.
pub mod health;
/// Leaderboard payloads.
pub mod leaderboard;
/// News payloads.
pub mod news;
/// Score submission validation.
pub mod validation;

/// Render an instant the way browsers print `Date.toISOString()`.
pub fn format_iso_millis(time: OffsetDateTime) -> String {
    let format =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");
    time.to_offset(UtcOffset::UTC)
        .format(format)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

/// Milliseconds since the Unix epoch.
pub fn epoch_millis(time: OffsetDateTime) -> i64 {
    (time.unix_timestamp_nanos() / 1_000_000) as i64
}
