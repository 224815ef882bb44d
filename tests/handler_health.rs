mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use common::{InMemoryCache, InMemoryStore};
use geo_redirect::api::handlers::health_handler;
use geo_redirect::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;

fn test_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[sqlx::test]
async fn test_health_endpoint_success(pool: PgPool) {
    let server = test_server(common::create_pg_state(pool));

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["message"], "Caching disabled");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let state = common::create_test_state(
        Arc::new(InMemoryStore::default()),
        Arc::new(InMemoryCache::default()),
    );
    let server = test_server(state);

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json.get("checks").is_some());
    assert!(json["checks"].get("store").is_some());
    assert!(json["checks"].get("cache").is_some());
}

#[tokio::test]
async fn test_health_store_down_is_degraded() {
    let store = Arc::new(InMemoryStore::default());
    store.set_failing(true);
    let server = test_server(common::create_test_state(
        store,
        Arc::new(InMemoryCache::default()),
    ));

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["store"]["status"], "error");
}

#[tokio::test]
async fn test_health_cache_down_is_degraded() {
    let cache = Arc::new(InMemoryCache::default());
    cache.set_fail_reads(true);
    let server = test_server(common::create_test_state(
        Arc::new(InMemoryStore::default()),
        cache,
    ));

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "error");
}
