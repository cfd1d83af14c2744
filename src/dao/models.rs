use serde::{Deserialize, Serialize};

/// Osouji difficulty level; each level owns its own leaderboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    /// `かんたん`
    #[serde(rename = "かんたん")]
    Easy,
    /// `ふつう`, used when a submission names no known difficulty.
    #[default]
    #[serde(rename = "ふつう")]
    Normal,
    /// `むずかしい`
    #[serde(rename = "むずかしい")]
    Hard,
}

impl Difficulty {
    /// Every difficulty, in display order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Label shown to players and used in storage keys.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "かんたん",
            Difficulty::Normal => "ふつう",
            Difficulty::Hard => "むずかしい",
        }
    }

    /// Parse a player-facing label or its English alias (`easy`, `normal`, `hard`).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.label() == value)
            .or_else(|| match value.to_ascii_lowercase().as_str() {
                "easy" => Some(Difficulty::Easy),
                "normal" => Some(Difficulty::Normal),
                "hard" => Some(Difficulty::Hard),
                _ => None,
            })
    }
}

/// One persisted leaderboard row.
///
/// The mode-specific fields are only present for the game mode that produced the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreRecord {
    /// Player name.
    pub name: String,
    /// Ranking key; ties keep the older record first.
    pub score: u32,
    /// Drop: longest chain reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chains: Option<i64>,
    /// Runner: laps completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laps: Option<i64>,
    /// Runner: zone reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Osouji: board the record belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Submission instant, ISO-8601 UTC with millisecond precision.
    pub date: String,
}

/// Headline extracted from the news feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NewsItem {
    /// Headline text.
    pub title: String,
    /// Article URL.
    #[serde(default)]
    pub link: String,
    /// `pubDate` as written by the feed.
    #[serde(default)]
    pub date: String,
    /// Publisher name.
    #[serde(default)]
    pub source: String,
}

/// Cached feed snapshot, replaced wholesale on each successful refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewsCacheEntry {
    /// Headlines of the last successful refresh.
    #[serde(default)]
    pub items: Vec<NewsItem>,
    /// Refresh instant in epoch milliseconds.
    #[serde(default)]
    pub updated_at: Option<i64>,
}
