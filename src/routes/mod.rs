use axum::{
    Router,
    http::{
        HeaderValue, Method, StatusCode,
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, CONTENT_TYPE},
    },
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

use crate::{error::AppError, state::SharedState};

/// Swagger UI and the OpenAPI document.
pub mod docs;
/// Health check route.
pub mod health;
/// Leaderboard routes.
pub mod leaderboard;
/// News route.
pub mod news;

/// Compose all route trees, wiring in shared state, documentation routes and CORS.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(leaderboard::router())
        .merge(news::router());

    let docs_router = docs::router(state.clone());

    api_router
        .merge(docs_router)
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(cors_layer())
}

/// Also sent on non-preflight responses, where [`CorsLayer`] only adds the origin.
const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

/// Any origin may call the API with GET, POST and OPTIONS.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

/// Empty 200 answer to CORS preflight requests.
pub(crate) async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Catch-all for methods a route does not serve.
pub(crate) async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
