use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use duck_arcade_back::{
    config::AppConfig,
    dao::kv_store::{KvStore, memory::MemoryKvStore},
    routes,
    services::news_feed::{FeedError, FeedSource},
    state::{AppState, SharedState},
};
use futures::future::BoxFuture;
use serde_json::{Value, json};
use tower::ServiceExt;

const FEED: &str = "<rss><channel>\
    <item><title><![CDATA[Rubber duck spotted]]></title><link>https://example.com/1</link>\
    <pubDate>Mon, 19 Oct 2026 08:00:00 GMT</pubDate><source url=\"https://example.com\">Example</source></item>\
    </channel></rss>";

struct StaticFeed {
    body: Option<&'static str>,
    calls: AtomicUsize,
}

impl FeedSource for StaticFeed {
    fn fetch(&self) -> BoxFuture<'static, Result<String, FeedError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = self.body;
        Box::pin(async move {
            body.map(str::to_owned).ok_or(FeedError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            })
        })
    }
}

struct TestApp {
    router: Router,
    store: MemoryKvStore,
    feed: Arc<StaticFeed>,
}

async fn app_with_feed(body: Option<&'static str>) -> TestApp {
    let store = MemoryKvStore::new();
    let feed = Arc::new(StaticFeed {
        body,
        calls: AtomicUsize::new(0),
    });
    let state = AppState::new(AppConfig::default(), feed.clone());
    state.install_kv_store(Arc::new(store.clone())).await;
    TestApp {
        router: routes::router(state),
        store,
        feed,
    }
}

async fn app() -> TestApp {
    app_with_feed(Some(FEED)).await
}

fn degraded_router() -> Router {
    let feed = Arc::new(StaticFeed {
        body: Some(FEED),
        calls: AtomicUsize::new(0),
    });
    let state: SharedState = AppState::new(AppConfig::default(), feed);
    routes::router(state)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(router: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    send(router, request).await
}

#[tokio::test]
async fn empty_board_is_an_empty_array() {
    let app = app().await;
    for uri in ["/api/drop-scores", "/api/runner-scores"] {
        let (status, body) = get(&app.router, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}

#[tokio::test]
async fn drop_submission_returns_the_updated_board() {
    let app = app().await;
    let (status, body) = post(
        &app.router,
        "/api/drop-scores",
        json!({"name": "Taro", "score": 1500, "chains": 3}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let board = body.as_array().unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0]["name"], "Taro");
    assert_eq!(board[0]["score"], 1500);
    assert_eq!(board[0]["chains"], 3);
    assert!(board[0]["date"].as_str().unwrap().ends_with('Z'));

    let (_, stored) = get(&app.router, "/api/drop-scores").await;
    assert_eq!(stored, body);
}

#[tokio::test]
async fn boards_are_sorted_best_first() {
    let app = app().await;
    post(&app.router, "/api/runner-scores", json!({"name": "A", "score": 100})).await;
    let (_, body) = post(
        &app.router,
        "/api/runner-scores",
        json!({"name": "B", "score": 200, "laps": 4, "zone": "Harbour"}),
    )
    .await;

    let scores: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["score"].as_u64().unwrap())
        .collect();
    assert_eq!(scores, vec![200, 100]);
    assert_eq!(body[0]["laps"], 4);
    assert_eq!(body[0]["zone"], "Harbour");
    assert_eq!(body[1]["laps"], 1);
    assert_eq!(body[1]["zone"], "");
}

#[tokio::test]
async fn invalid_submissions_are_rejected_without_writing() {
    let app = app().await;

    let (status, body) = post(&app.router, "/api/drop-scores", json!({"name": "  ", "score": 10})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Name is required"}));

    let (status, body) = post(
        &app.router,
        "/api/drop-scores",
        json!({"name": "Taro", "score": 100_000_000}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid score"}));

    assert!(app.store.is_empty());
}

#[tokio::test]
async fn non_json_body_is_treated_as_missing_name() {
    let app = app().await;
    let request = Request::post("/api/runner-scores")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))
        .unwrap();

    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Name is required"}));
}

#[tokio::test]
async fn long_names_are_cut_to_fifteen_characters() {
    let app = app().await;
    let (_, body) = post(
        &app.router,
        "/api/drop-scores",
        json!({"name": "ABCDEFGHIJKLMNOPQRST", "score": 5}),
    )
    .await;
    assert_eq!(body[0]["name"], "ABCDEFGHIJKLMNO");
}

#[tokio::test]
async fn osouji_reads_one_board_or_all_three() {
    let app = app().await;
    post(
        &app.router,
        "/api/osouji-scores",
        json!({"name": "Hanako", "score": 300, "difficulty": "ふつう"}),
    )
    .await;

    // ふつう
    let (status, single) = get(
        &app.router,
        "/api/osouji-scores?difficulty=%E3%81%B5%E3%81%A4%E3%81%86",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single.as_array().unwrap().len(), 1);
    assert_eq!(single[0]["difficulty"], "ふつう");

    let (_, all) = get(&app.router, "/api/osouji-scores").await;
    let boards = all.as_object().unwrap();
    assert_eq!(boards.len(), 3);
    assert_eq!(boards["かんたん"], json!([]));
    assert_eq!(boards["ふつう"].as_array().unwrap().len(), 1);
    assert_eq!(boards["むずかしい"], json!([]));

    let (_, unknown) = get(&app.router, "/api/osouji-scores?difficulty=extreme").await;
    assert_eq!(unknown, all);
}

#[tokio::test]
async fn repeated_difficulty_returns_all_boards() {
    let app = app().await;
    let (status, body) = get(&app.router, "/api/osouji-scores?difficulty=a&difficulty=b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"かんたん": [], "ふつう": [], "むずかしい": []})
    );
}

#[tokio::test]
async fn unsupported_methods_are_rejected() {
    let app = app().await;
    for method in ["PUT", "DELETE"] {
        let request = Request::builder()
            .method(method)
            .uri("/api/drop-scores")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"error": "Method not allowed"}));
    }

    let request = Request::post("/api/news").body(Body::empty()).unwrap();
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn preflight_and_cors_headers() {
    let app = app().await;

    let request = Request::options("/api/runner-scores")
        .header(header::ORIGIN, "https://duck.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );

    for request in [
        Request::get("/api/drop-scores")
            .header(header::ORIGIN, "https://duck.example")
            .body(Body::empty())
            .unwrap(),
        Request::post("/api/drop-scores")
            .header(header::ORIGIN, "https://duck.example")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Taro","score":1}"#))
            .unwrap(),
    ] {
        let response = app.router.clone().oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }
}

#[tokio::test]
async fn news_is_fetched_once_then_served_from_cache() {
    let app = app().await;

    let (status, first) = get(&app.router, "/api/news").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["items"][0]["title"], "Rubber duck spotted");
    assert_eq!(first["items"][0]["source"], "Example");
    assert!(first["updatedAt"].is_i64());
    assert!(first.get("stale").is_none());

    let (_, second) = get(&app.router, "/api/news").await;
    assert_eq!(second, first);
    assert_eq!(app.feed.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn news_falls_back_to_stale_cache() {
    let app = app_with_feed(None).await;
    app.store
        .set(
            "rubber-duck-news",
            json!({
                "items": [{"title": "Old duck", "link": "", "date": "", "source": ""}],
                "updatedAt": 0
            }),
        )
        .await
        .unwrap();

    let (status, body) = get(&app.router, "/api/news").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stale"], true);
    assert_eq!(body["updatedAt"], 0);
    assert_eq!(body["items"][0]["title"], "Old duck");
}

#[tokio::test]
async fn news_without_cache_or_feed_is_empty() {
    let app = app_with_feed(None).await;
    let (status, body) = get(&app.router, "/api/news").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"items": [], "updatedAt": null}));
}

#[tokio::test]
async fn degraded_mode_reads_empty_and_fails_writes() {
    let router = degraded_router();

    let (status, body) = get(&router, "/api/drop-scores").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = post(&router, "/api/drop-scores", json!({"name": "Taro", "score": 10})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Server error"}));

    let (_, health) = get(&router, "/healthcheck").await;
    assert_eq!(health, json!({"status": "degraded"}));
}

#[tokio::test]
async fn healthcheck_reports_ok_with_storage() {
    let app = app().await;
    let (status, body) = get(&app.router, "/healthcheck").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app().await;
    let (status, body) = get(&app.router, "/api-doc/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/news"].is_object());
}
