use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{MethodRouter, get},
};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::debug;

use crate::{
    dao::{
        leaderboard::{Board, GameMode},
        models::Difficulty,
    },
    dto::leaderboard::{DifficultyQuery, OsoujiScores, ScoreEntry, ScoreSubmissionRequest},
    error::{AppError, ErrorBody},
    routes::{method_not_allowed, preflight},
    services::leaderboard_service,
    state::SharedState,
};

/// Score board routes, one path per game.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/drop-scores", board_route(get(get_drop_scores).post(post_drop_score)))
        .route(
            "/api/osouji-scores",
            board_route(get(get_osouji_scores).post(post_osouji_score)),
        )
        .route(
            "/api/runner-scores",
            board_route(get(get_runner_scores).post(post_runner_score)),
        )
}

fn board_route(methods: MethodRouter<SharedState>) -> MethodRouter<SharedState> {
    methods.options(preflight).fallback(method_not_allowed)
}

/// Bodies that are not a JSON document are validated as an empty payload.
fn payload_or_null(payload: Result<Json<Value>, JsonRejection>) -> Value {
    match payload {
        Ok(Json(value)) => value,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable submission body");
            Value::Null
        }
    }
}

/// Query strings that do not parse (e.g. a repeated `difficulty`) select no board.
fn query_or_default(query: Result<Query<DifficultyQuery>, QueryRejection>) -> DifficultyQuery {
    match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable osouji query");
            DifficultyQuery::default()
        }
    }
}

async fn submit(
    state: &SharedState,
    mode: GameMode,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<ScoreEntry>>, AppError> {
    let payload = payload_or_null(payload);
    let board =
        leaderboard_service::submit_score(state, mode, &payload, OffsetDateTime::now_utc()).await?;
    Ok(Json(board))
}

/// Current drop leaderboard, best score first.
#[utoipa::path(
    get,
    path = "/api/drop-scores",
    tag = "leaderboards",
    responses((status = 200, description = "Drop leaderboard", body = [ScoreEntry]))
)]
pub async fn get_drop_scores(State(state): State<SharedState>) -> Json<Vec<ScoreEntry>> {
    Json(leaderboard_service::get_board(&state, Board::Drop).await)
}

/// Submit a drop score; `chains` is recorded alongside.
#[utoipa::path(
    post,
    path = "/api/drop-scores",
    tag = "leaderboards",
    request_body = ScoreSubmissionRequest,
    responses(
        (status = 200, description = "Updated drop leaderboard", body = [ScoreEntry]),
        (status = 400, description = "Invalid name or score", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn post_drop_score(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<ScoreEntry>>, AppError> {
    submit(&state, GameMode::Drop, payload).await
}

/// One osouji board when `difficulty` names a known level, otherwise all three keyed by label.
#[utoipa::path(
    get,
    path = "/api/osouji-scores",
    tag = "leaderboards",
    params(DifficultyQuery),
    responses((status = 200, description = "Osouji leaderboard(s)", body = OsoujiScores))
)]
pub async fn get_osouji_scores(
    State(state): State<SharedState>,
    query: Result<Query<DifficultyQuery>, QueryRejection>,
) -> Json<OsoujiScores> {
    let query = query_or_default(query);
    let difficulty = query.difficulty.as_deref().and_then(Difficulty::parse);
    let scores = match difficulty {
        Some(difficulty) => OsoujiScores::Single(
            leaderboard_service::get_board(&state, Board::Osouji(difficulty)).await,
        ),
        None => OsoujiScores::All(leaderboard_service::get_osouji_boards(&state).await),
    };
    Json(scores)
}

/// Submit an osouji score to the board of its difficulty.
#[utoipa::path(
    post,
    path = "/api/osouji-scores",
    tag = "leaderboards",
    request_body = ScoreSubmissionRequest,
    responses(
        (status = 200, description = "Updated board for the submitted difficulty", body = [ScoreEntry]),
        (status = 400, description = "Invalid name or score", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn post_osouji_score(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<ScoreEntry>>, AppError> {
    submit(&state, GameMode::Osouji, payload).await
}

/// Current runner leaderboard, best score first.
#[utoipa::path(
    get,
    path = "/api/runner-scores",
    tag = "leaderboards",
    responses((status = 200, description = "Runner leaderboard", body = [ScoreEntry]))
)]
pub async fn get_runner_scores(State(state): State<SharedState>) -> Json<Vec<ScoreEntry>> {
    Json(leaderboard_service::get_board(&state, Board::Runner).await)
}

/// Submit a runner score with its `laps` and `zone`.
#[utoipa::path(
    post,
    path = "/api/runner-scores",
    tag = "leaderboards",
    request_body = ScoreSubmissionRequest,
    responses(
        (status = 200, description = "Updated runner leaderboard", body = [ScoreEntry]),
        (status = 400, description = "Invalid name or score", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn post_runner_score(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<ScoreEntry>>, AppError> {
    submit(&state, GameMode::Runner, payload).await
}
