use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::dao::{
    leaderboard::Board,
    models::{Difficulty, ScoreRecord},
};

/// Validated and normalized score submission, not yet dated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmission {
    /// Trimmed, at most 15 characters.
    pub name: String,
    /// Floored, within `1..=99_999_999`.
    pub score: u32,
    /// Mode-specific fields.
    pub extras: ModeExtras,
}

/// Fields specific to the game mode a score was submitted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeExtras {
    /// Drop game.
    Drop {
        /// Longest chain reached.
        chains: i64,
    },
    /// Osouji game.
    Osouji {
        /// Board the score goes to.
        difficulty: Difficulty,
    },
    /// Runner game.
    Runner {
        /// Laps completed.
        laps: i64,
        /// Zone reached, at most 20 characters.
        zone: String,
    },
}

impl ScoreSubmission {
    /// Leaderboard this submission competes on.
    pub fn board(&self) -> Board {
        match self.extras {
            ModeExtras::Drop { .. } => Board::Drop,
            ModeExtras::Osouji { difficulty } => Board::Osouji(difficulty),
            ModeExtras::Runner { .. } => Board::Runner,
        }
    }

    /// Turn the submission into a stored record stamped with `date`.
    pub fn into_record(self, date: String) -> ScoreRecord {
        let mut record = ScoreRecord {
            name: self.name,
            score: self.score,
            chains: None,
            laps: None,
            zone: None,
            difficulty: None,
            date,
        };
        match self.extras {
            ModeExtras::Drop { chains } => record.chains = Some(chains),
            ModeExtras::Osouji { difficulty } => record.difficulty = Some(difficulty),
            ModeExtras::Runner { laps, zone } => {
                record.laps = Some(laps);
                record.zone = Some(zone);
            }
        }
        record
    }
}

/// Documentation-only schema of a score submission; handlers read the body as untyped
/// JSON and [`validate_submission`](crate::dto::validation::validate_submission) checks
/// every field, so any JSON type is accepted on the wire and rejected with a message.
#[allow(dead_code)]
#[derive(Debug, ToSchema)]
pub struct ScoreSubmissionRequest {
    /// Player name, trimmed and cut to 15 characters. Missing or blank: 400 "Name is required".
    #[schema(value_type = Object, required = false, example = "Taro")]
    pub name: Option<serde_json::Value>,
    /// Number in `(0, 99_999_999]`, floored. Anything else: 400 "Invalid score".
    #[schema(value_type = Object, required = false, example = 1500)]
    pub score: Option<serde_json::Value>,
    /// Drop only; defaults to 0.
    pub chains: Option<f64>,
    /// Runner only; defaults to 1.
    pub laps: Option<f64>,
    /// Runner only; cut to 20 characters.
    pub zone: Option<String>,
    /// Osouji only; `かんたん`, `ふつう` or `むずかしい`, defaults to `ふつう`.
    pub difficulty: Option<String>,
}

/// One leaderboard row as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ScoreEntry {
    /// Player name.
    pub name: String,
    /// Score, the ranking key.
    pub score: u32,
    /// Drop only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chains: Option<i64>,
    /// Runner only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laps: Option<i64>,
    /// Runner only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Osouji only; difficulty label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// ISO-8601 submission instant.
    pub date: String,
}

impl From<ScoreRecord> for ScoreEntry {
    fn from(record: ScoreRecord) -> Self {
        Self {
            name: record.name,
            score: record.score,
            chains: record.chains,
            laps: record.laps,
            zone: record.zone,
            difficulty: record.difficulty.map(|d| d.label().to_owned()),
            date: record.date,
        }
    }
}

/// Map stored records into response rows, keeping their order.
pub fn to_entries(records: Vec<ScoreRecord>) -> Vec<ScoreEntry> {
    records.into_iter().map(ScoreEntry::from).collect()
}

/// Query string accepted by the osouji leaderboard read.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DifficultyQuery {
    /// Difficulty label; omitted or unknown returns every board.
    pub difficulty: Option<String>,
}

/// All three osouji boards keyed by difficulty label.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct OsoujiBoards {
    /// `かんたん` board.
    #[serde(rename = "かんたん")]
    pub easy: Vec<ScoreEntry>,
    /// `ふつう` board.
    #[serde(rename = "ふつう")]
    pub normal: Vec<ScoreEntry>,
    /// `むずかしい` board.
    #[serde(rename = "むずかしい")]
    pub hard: Vec<ScoreEntry>,
}

/// Osouji read result: one board when a difficulty was requested, otherwise all of them.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum OsoujiScores {
    /// Board of the requested difficulty.
    Single(Vec<ScoreEntry>),
    /// Every board.
    All(OsoujiBoards),
}
