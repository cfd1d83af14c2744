use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::dao::{
    kv_store::KvStore,
    models::{Difficulty, ScoreRecord},
    storage::{StorageError, StorageResult},
};

const DROP_KEY: &str = "duck-drop-leaderboard";
const RUNNER_KEY: &str = "duck-runner-leaderboard";
const OSOUJI_KEY_PREFIX: &str = "duck-osouji-lb-";

/// Game whose scores are being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Falling-duck puzzle; records carry `chains`.
    Drop,
    /// Cleaning game; records carry `difficulty` and land on that difficulty's board.
    Osouji,
    /// Endless runner; records carry `laps` and `zone`.
    Runner,
}

/// A single leaderboard, i.e. one storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    /// The drop board.
    Drop,
    /// One of the three osouji boards.
    Osouji(Difficulty),
    /// The runner board.
    Runner,
}

impl Board {
    /// Key under which the board is persisted.
    pub fn storage_key(self) -> String {
        match self {
            Board::Drop => DROP_KEY.to_owned(),
            Board::Runner => RUNNER_KEY.to_owned(),
            Board::Osouji(difficulty) => format!("{OSOUJI_KEY_PREFIX}{}", difficulty.label()),
        }
    }
}

/// Typed access to leaderboards kept in the key-value store.
#[derive(Clone)]
pub struct LeaderboardRepository {
    store: Arc<dyn KvStore>,
}

impl LeaderboardRepository {
    /// Wrap the installed store.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Load a leaderboard; a key that was never written reads as an empty board.
    ///
    /// Rows that no longer decode are dropped, so the next save rewrites the key without
    /// them. A value that is not a list at all is a [`StorageError::Decode`].
    pub async fn load(&self, board: Board) -> StorageResult<Vec<ScoreRecord>> {
        let key = board.storage_key();
        match self.store.get(&key).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(rows)) => Ok(decode_rows(&key, rows)),
            Some(value) => serde_json::from_value::<Vec<ScoreRecord>>(value)
                .map_err(|source| StorageError::decode(key, source)),
        }
    }

    /// Replace the whole leaderboard stored for `board`.
    pub async fn save(&self, board: Board, records: &[ScoreRecord]) -> StorageResult<()> {
        let key = board.storage_key();
        let value =
            serde_json::to_value(records).map_err(|source| StorageError::encode(&key, source))?;
        self.store.set(&key, value).await
    }
}

fn decode_rows(key: &str, rows: Vec<Value>) -> Vec<ScoreRecord> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(key, index, error = %err, "skipping undecodable leaderboard row");
                None
            }
        })
        .collect()
}
