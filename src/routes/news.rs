use axum::{Json, Router, extract::State, routing::get};
use time::OffsetDateTime;

use crate::{
    dto::news::NewsResponse,
    routes::{method_not_allowed, preflight},
    services::news_service,
    state::SharedState,
};

/// News route.
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/api/news",
        get(get_news).options(preflight).fallback(method_not_allowed),
    )
}

/// Rubber duck headlines, refreshed at most once per cache window.
#[utoipa::path(
    get,
    path = "/api/news",
    tag = "news",
    responses((
        status = 200,
        description = "Cached headlines; `stale` is set when the refresh failed",
        body = NewsResponse
    ))
)]
pub async fn get_news(State(state): State<SharedState>) -> Json<NewsResponse> {
    Json(news_service::latest_news(&state, OffsetDateTime::now_utc()).await)
}
