//! Leaderboard reads and score submissions for every game mode.

use futures::try_join;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    dao::{
        leaderboard::{Board, GameMode, LeaderboardRepository},
        models::Difficulty,
    },
    dto::{
        leaderboard::{OsoujiBoards, ScoreEntry, to_entries},
        validation::validate_submission,
    },
    error::ServiceError,
    services::ranking,
    state::SharedState,
};

async fn repository(state: &SharedState) -> Result<LeaderboardRepository, ServiceError> {
    let store = state.require_kv_store().await?;
    Ok(LeaderboardRepository::new(store))
}

/// Return one board; storage failures degrade to an empty board.
pub async fn get_board(state: &SharedState, board: Board) -> Vec<ScoreEntry> {
    match load_board(state, board).await {
        Ok(entries) => entries,
        Err(err) => {
            warn!(key = %board.storage_key(), error = %err, "leaderboard read failed; serving empty board");
            Vec::new()
        }
    }
}

async fn load_board(state: &SharedState, board: Board) -> Result<Vec<ScoreEntry>, ServiceError> {
    let records = repository(state).await?.load(board).await?;
    Ok(to_entries(records))
}

/// Return the three osouji boards, read concurrently. Any failure degrades to three
/// empty boards.
pub async fn get_osouji_boards(state: &SharedState) -> OsoujiBoards {
    match load_osouji_boards(state).await {
        Ok(boards) => boards,
        Err(err) => {
            warn!(error = %err, "osouji leaderboards read failed; serving empty boards");
            OsoujiBoards::default()
        }
    }
}

async fn load_osouji_boards(state: &SharedState) -> Result<OsoujiBoards, ServiceError> {
    let repository = repository(state).await?;
    let [easy, normal, hard] = Difficulty::ALL.map(Board::Osouji);
    let (easy, normal, hard) = try_join!(
        repository.load(easy),
        repository.load(normal),
        repository.load(hard),
    )?;

    Ok(OsoujiBoards {
        easy: to_entries(easy),
        normal: to_entries(normal),
        hard: to_entries(hard),
    })
}

/// Validate a submission for `mode`, merge it into its board and persist the result.
///
/// The read-modify-write is not atomic: two concurrent submissions to the same board
/// may both read the old board, and the later write wins.
pub async fn submit_score(
    state: &SharedState,
    mode: GameMode,
    payload: &Value,
    now: OffsetDateTime,
) -> Result<Vec<ScoreEntry>, ServiceError> {
    let submission = validate_submission(mode, payload)?;
    let board = submission.board();
    let repository = repository(state).await?;

    let current = repository.load(board).await?;
    let updated = ranking::upsert(
        current,
        submission,
        now,
        state.config().leaderboard.max_entries,
    );
    repository.save(board, &updated).await?;

    info!(key = %board.storage_key(), entries = updated.len(), "score submitted");
    Ok(to_entries(updated))
}
