//! Validation helpers for score submissions.

use serde_json::Value;
use thiserror::Error;
use validator::ValidationError;

use crate::{
    dao::{leaderboard::GameMode, models::Difficulty},
    dto::leaderboard::{ModeExtras, ScoreSubmission},
};

/// Longest player name kept, in characters.
pub const MAX_NAME_CHARS: usize = 15;
/// Longest runner zone kept, in characters.
pub const MAX_ZONE_CHARS: usize = 20;
/// Highest accepted score.
pub const MAX_SCORE: f64 = 99_999_999.0;

const DEFAULT_CHAINS: i64 = 0;
const DEFAULT_LAPS: i64 = 1;

/// Reasons a submission is rejected. The display text is sent back to the client.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// `name` is absent, not a string, or blank.
    #[error("Name is required")]
    MissingName,
    /// `score` is absent, not a number, or out of range.
    #[error("Invalid score")]
    InvalidScore,
}

/// Check and normalize an untyped submission payload for `mode`.
///
/// The name must be a non-blank string and the score a number in `(0, 99_999_999]`.
/// Extra fields never fail validation: values of the wrong type fall back to the mode
/// default.
///
/// # Examples
///
/// ```ignore
/// validate_submission(GameMode::Drop, &json!({"name": " Taro ", "score": 1500.7}))
/// // Ok(ScoreSubmission { name: "Taro", score: 1500, extras: Drop { chains: 0 } })
/// ```
pub fn validate_submission(
    mode: GameMode,
    payload: &Value,
) -> Result<ScoreSubmission, SubmissionError> {
    let name = payload.get("name").and_then(Value::as_str).unwrap_or_default();
    validate_player_name(name).map_err(|_| SubmissionError::MissingName)?;

    let score = payload
        .get("score")
        .and_then(Value::as_f64)
        .unwrap_or(f64::NAN);
    validate_score(score).map_err(|_| SubmissionError::InvalidScore)?;

    Ok(ScoreSubmission {
        name: truncate_chars(name.trim(), MAX_NAME_CHARS),
        score: score.floor() as u32,
        extras: mode_extras(mode, payload),
    })
}

/// Validates that a player name has at least one non-whitespace character.
///
/// # Examples
///
/// ```ignore
/// validate_player_name(" Taro ") // Ok
/// validate_player_name("   ")    // Err - blank
/// ```
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_required");
        err.message = Some(SubmissionError::MissingName.to_string().into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a score lies in `(0, MAX_SCORE]`. NaN is rejected.
///
/// # Examples
///
/// ```ignore
/// validate_score(1500.7)        // Ok
/// validate_score(0.0)           // Err - not positive
/// validate_score(100_000_000.0) // Err - above MAX_SCORE
/// ```
pub fn validate_score(score: f64) -> Result<(), ValidationError> {
    if !(score > 0.0 && score <= MAX_SCORE) {
        let mut err = ValidationError::new("score_range");
        err.message = Some(format!("Score must be in (0, {MAX_SCORE}] (got {score})").into());
        return Err(err);
    }
    Ok(())
}

fn mode_extras(mode: GameMode, payload: &Value) -> ModeExtras {
    match mode {
        GameMode::Drop => ModeExtras::Drop {
            chains: floored_int(payload.get("chains")).unwrap_or(DEFAULT_CHAINS),
        },
        GameMode::Runner => ModeExtras::Runner {
            laps: floored_int(payload.get("laps")).unwrap_or(DEFAULT_LAPS),
            zone: payload
                .get("zone")
                .and_then(Value::as_str)
                .map(|zone| truncate_chars(zone, MAX_ZONE_CHARS))
                .unwrap_or_default(),
        },
        GameMode::Osouji => ModeExtras::Osouji {
            difficulty: payload
                .get("difficulty")
                .and_then(Value::as_str)
                .and_then(Difficulty::parse)
                .unwrap_or_default(),
        },
    }
}

fn floored_int(value: Option<&Value>) -> Option<i64> {
    value.and_then(Value::as_f64).map(|n| n.floor() as i64)
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_validate_player_name() {
        assert!(validate_player_name("Taro").is_ok());
        assert!(validate_player_name("  ラバーダック ").is_ok());

        let err = validate_player_name(" \t ").unwrap_err();
        assert_eq!(err.code, "name_required");
        assert!(validate_player_name("").is_err());
    }

    #[test]
    fn test_validate_score_bounds() {
        assert!(validate_score(0.5).is_ok());
        assert!(validate_score(MAX_SCORE).is_ok());

        assert!(validate_score(0.0).is_err());
        assert!(validate_score(-1.0).is_err());
        assert!(validate_score(MAX_SCORE + 1.0).is_err());
        assert_eq!(validate_score(f64::NAN).unwrap_err().code, "score_range");
    }

    #[test]
    fn test_missing_or_blank_name_is_rejected() {
        for payload in [
            json!({"score": 10}),
            json!({"name": "", "score": 10}),
            json!({"name": "   ", "score": 10}),
            json!({"name": 42, "score": 10}),
            json!({"name": null, "score": 10}),
            json!("not an object"),
            Value::Null,
        ] {
            assert_eq!(
                validate_submission(GameMode::Drop, &payload),
                Err(SubmissionError::MissingName),
                "payload {payload}"
            );
        }
    }

    #[test]
    fn test_out_of_range_score_is_rejected() {
        for payload in [
            json!({"name": "Taro"}),
            json!({"name": "Taro", "score": 0}),
            json!({"name": "Taro", "score": -5}),
            json!({"name": "Taro", "score": 100_000_000}),
            json!({"name": "Taro", "score": "1500"}),
        ] {
            assert_eq!(
                validate_submission(GameMode::Runner, &payload),
                Err(SubmissionError::InvalidScore),
                "payload {payload}"
            );
        }
    }

    #[test]
    fn test_name_is_checked_before_score() {
        let payload = json!({"name": " ", "score": -1});
        assert_eq!(
            validate_submission(GameMode::Drop, &payload),
            Err(SubmissionError::MissingName)
        );
    }

    #[test]
    fn test_upper_bound_is_inclusive_and_score_is_floored() {
        let max = validate_submission(GameMode::Drop, &json!({"name": "a", "score": 99_999_999}))
            .unwrap();
        assert_eq!(max.score, 99_999_999);

        let floored =
            validate_submission(GameMode::Drop, &json!({"name": "a", "score": 1500.9})).unwrap();
        assert_eq!(floored.score, 1500);
    }

    #[test]
    fn test_name_is_trimmed_and_truncated_to_fifteen_chars() {
        let submission = validate_submission(
            GameMode::Drop,
            &json!({"name": "  abcdefghijklmnopqrstuvwxyz  ", "score": 1}),
        )
        .unwrap();
        assert_eq!(submission.name, "abcdefghijklmno");

        let japanese = validate_submission(
            GameMode::Drop,
            &json!({"name": "あいうえおかきくけこさしすせそたち", "score": 1}),
        )
        .unwrap();
        assert_eq!(japanese.name.chars().count(), 15);
        assert_eq!(japanese.name, "あいうえおかきくけこさしすせそ");
    }

    #[test]
    fn test_drop_chains_default_and_floor() {
        let with_chains =
            validate_submission(GameMode::Drop, &json!({"name": "a", "score": 1, "chains": 3.7}))
                .unwrap();
        assert_eq!(with_chains.extras, ModeExtras::Drop { chains: 3 });

        let bad_chains =
            validate_submission(GameMode::Drop, &json!({"name": "a", "score": 1, "chains": "3"}))
                .unwrap();
        assert_eq!(bad_chains.extras, ModeExtras::Drop { chains: 0 });
    }

    #[test]
    fn test_runner_extras_defaults_and_truncation() {
        let defaults =
            validate_submission(GameMode::Runner, &json!({"name": "a", "score": 1})).unwrap();
        assert_eq!(
            defaults.extras,
            ModeExtras::Runner {
                laps: 1,
                zone: String::new()
            }
        );

        let provided = validate_submission(
            GameMode::Runner,
            &json!({"name": "a", "score": 1, "laps": 4, "zone": "Bathtub Rapids And Beyond!!"}),
        )
        .unwrap();
        assert_eq!(
            provided.extras,
            ModeExtras::Runner {
                laps: 4,
                zone: "Bathtub Rapids And B".into()
            }
        );
    }

    #[test]
    fn test_osouji_difficulty_snaps_to_known_levels() {
        let cases = [
            (json!("むずかしい"), Difficulty::Hard),
            (json!("easy"), Difficulty::Easy),
            (json!("nightmare"), Difficulty::Normal),
            (json!(3), Difficulty::Normal),
            (Value::Null, Difficulty::Normal),
        ];
        for (difficulty, expected) in cases {
            let submission = validate_submission(
                GameMode::Osouji,
                &json!({"name": "a", "score": 1, "difficulty": difficulty}),
            )
            .unwrap();
            assert_eq!(
                submission.extras,
                ModeExtras::Osouji {
                    difficulty: expected
                }
            );
        }
    }
}
