//! Leaderboard upsert: append a submission, re-sort, and keep the top entries.

use time::OffsetDateTime;

use crate::{
    dao::models::ScoreRecord,
    dto::{format_iso_millis, leaderboard::ScoreSubmission},
};

/// Insert `submission` into `board` and return the new top-`capacity` board.
///
/// The submission is dated `now`. The sort is stable, so a new record ranks after any
/// existing record with the same score; whether it survives the cut depends only on
/// its rank among the combined entries.
pub fn upsert(
    mut board: Vec<ScoreRecord>,
    submission: ScoreSubmission,
    now: OffsetDateTime,
    capacity: usize,
) -> Vec<ScoreRecord> {
    board.push(submission.into_record(format_iso_millis(now)));
    board.sort_by(|a, b| b.score.cmp(&a.score));
    board.truncate(capacity);
    board
}
