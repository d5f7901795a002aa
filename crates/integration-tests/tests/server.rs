//! Integration tests for health checks, static files, and CORS.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use webstore_gateway::db::InMemoryStore;
use webstore_integration_tests::{FailingStore, TestApp};

#[tokio::test]
async fn test_liveness_is_ok() {
    let (app, _store) = TestApp::in_memory();

    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn test_readiness_follows_store() {
    let (app, _store) = TestApp::in_memory();
    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);

    let app = TestApp::with_store(Arc::new(FailingStore::new("no primary")));
    assert_eq!(
        app.get("/health/ready").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(app.get("/health").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_static_files_are_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hello.txt"), "hello from disk").unwrap();

    let app = TestApp::with_store_and_static_dir(Arc::new(InMemoryStore::new()), dir.path());

    let response = app.get("/static/hello.txt").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "hello from disk");

    let response = app.get("/static/missing.txt").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    assert!(
        app.drain_activity()
            .await
            .contains(&"Request: GET /static/hello.txt".to_string())
    );
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (app, _store) = TestApp::in_memory();

    let request = Request::builder()
        .uri("/collection/widgets")
        .header(header::ORIGIN, "https://shop.example")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_cors_preflight_allows_put() {
    let (app, _store) = TestApp::in_memory();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/collection/widgets/65a1b2c3d4e5f60718293a4b")
        .header(header::ORIGIN, "https://shop.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _store) = TestApp::in_memory();

    assert_eq!(app.get("/nothing/here/at/all").await.status, StatusCode::NOT_FOUND);
}
