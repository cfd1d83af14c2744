use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI document for Duck Arcade Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::leaderboard::get_drop_scores,
        crate::routes::leaderboard::post_drop_score,
        crate::routes::leaderboard::get_osouji_scores,
        crate::routes::leaderboard::post_osouji_score,
        crate::routes::leaderboard::get_runner_scores,
        crate::routes::leaderboard::post_runner_score,
        crate::routes::news::get_news,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::leaderboard::ScoreEntry,
            crate::dto::leaderboard::ScoreSubmissionRequest,
            crate::dto::leaderboard::OsoujiBoards,
            crate::dto::leaderboard::OsoujiScores,
            crate::dto::news::NewsResponse,
            crate::dto::news::NewsHeadline,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "leaderboards", description = "Per-game high score boards"),
        (name = "news", description = "Cached rubber duck headlines"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_public_path() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/healthcheck",
            "/api/drop-scores",
            "/api/osouji-scores",
            "/api/runner-scores",
            "/api/news",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn submission_schema_leaves_name_and_score_optional() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schema = &doc["components"]["schemas"]["ScoreSubmissionRequest"];
        assert!(schema["properties"]["name"].is_object());
        assert!(schema["properties"]["score"].is_object());

        let required: Vec<&str> = schema["required"]
            .as_array()
            .map(|fields| fields.iter().filter_map(|f| f.as_str()).collect())
            .unwrap_or_default();
        assert!(!required.contains(&"name"));
        assert!(!required.contains(&"score"));
    }
}
