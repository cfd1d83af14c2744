//! Duck Arcade Back binary entrypoint wiring the leaderboard and news REST API to its storage backend.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "couch-store")]
use duck_arcade_back::dao::kv_store::couchdb::{CouchConfig, CouchKvStore};
#[cfg(feature = "mongo-store")]
use duck_arcade_back::dao::kv_store::mongodb::{MongoConfig, MongoKvStore};
use duck_arcade_back::{
    config::AppConfig,
    dao::{
        kv_store::{
            KvStore,
            memory::MemoryKvStore,
            rest::{RestConfig, RestKvStore},
        },
        storage::StorageError,
    },
    routes,
    services::{news_feed::HttpFeedSource, storage_supervisor},
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let feed = HttpFeedSource::new(&config.news).context("building news feed client")?;
    info!(url = %feed.url(), "news feed configured");

    let app_state = AppState::new(config, Arc::new(feed));
    start_storage(&app_state).await;

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Install the storage backend named by `KV_BACKEND`.
///
/// Remote backends are connected by the storage supervisor in the background; the server
/// answers in degraded mode until the first connection succeeds.
async fn start_storage(state: &SharedState) {
    let backend = env::var("KV_BACKEND").unwrap_or_else(|_| {
        if env::var("KV_REST_API_URL").is_ok() {
            "rest".into()
        } else {
            "memory".into()
        }
    });

    match backend.as_str() {
        "rest" => {
            info!("using REST key-value backend");
            tokio::spawn(storage_supervisor::run(state.clone(), || async {
                let config = RestConfig::from_env()?;
                let store = RestKvStore::connect(config).await?;
                Ok::<Arc<dyn KvStore>, StorageError>(Arc::new(store))
            }));
        }
        #[cfg(feature = "couch-store")]
        "couch" | "couchdb" => {
            info!("using CouchDB key-value backend");
            tokio::spawn(storage_supervisor::run(state.clone(), || async {
                let config = CouchConfig::from_env()?;
                let store = CouchKvStore::connect(config).await?;
                Ok::<Arc<dyn KvStore>, StorageError>(Arc::new(store))
            }));
        }
        #[cfg(feature = "mongo-store")]
        "mongo" | "mongodb" => {
            info!("using MongoDB key-value backend");
            tokio::spawn(storage_supervisor::run(state.clone(), || async {
                let config = MongoConfig::from_env().await?;
                let store = MongoKvStore::connect(config).await?;
                Ok::<Arc<dyn KvStore>, StorageError>(Arc::new(store))
            }));
        }
        other => {
            if other != "memory" {
                warn!(backend = other, "unknown KV_BACKEND; falling back to in-memory storage");
            }
            info!("using in-memory key-value backend; data is lost on restart");
            state.install_kv_store(Arc::new(MemoryKvStore::new())).await;
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state).layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
