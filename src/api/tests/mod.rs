use super::*;
use crate::process::scripted::Script;
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use std::time::Duration;
use tower::ServiceExt;

mod system;

const VIDEO_URL: &str = "https://www.youtube.com/watch?v=aqz-KE-bpKQ";

/// Helper to create a test downloader wrapped in Arc, plus its router
async fn create_test_app(script: Script) -> (Arc<MediaDownloader>, Router, tempfile::TempDir) {
    let (downloader, _runner, temp_dir) =
        crate::downloader::test_helpers::create_test_downloader(script).await;
    let downloader = Arc::new(downloader);
    let app = create_router(downloader.clone(), downloader.get_config());
    (downloader, app, temp_dir)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_api_server_spawns() {
    let (downloader, _app, _temp_dir) = create_test_app(Script::exit(0)).await;

    let mut config = (*downloader.get_config()).clone();
    config.api.bind_address = "127.0.0.1:0".parse().unwrap();
    let config = Arc::new(config);

    let api_handle = tokio::spawn({
        let downloader = downloader.clone();
        let config = config.clone();
        async move { start_api_server(downloader, config).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!api_handle.is_finished(), "server exited early");
    api_handle.abort();
}

#[tokio::test]
async fn test_cors_enabled() {
    let (downloader, _app, _temp_dir) = create_test_app(Script::exit(0)).await;

    let mut config = (*downloader.get_config()).clone();
    config.api.cors_enabled = true;
    config.api.cors_origins = vec!["*".to_string()];
    let app = create_router(downloader, Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let (downloader, _app, _temp_dir) = create_test_app(Script::exit(0)).await;

    let mut config = (*downloader.get_config()).clone();
    config.api.cors_enabled = false;
    let app = create_router(downloader, Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_cors_preflight_allows_json_post() {
    let (downloader, _app, _temp_dir) = create_test_app(Script::exit(0)).await;

    let mut config = (*downloader.get_config()).clone();
    config.api.cors_enabled = true;
    config.api.cors_origins = vec!["bad\norigin".to_string(), "http://localhost:3000".to_string()];
    let app = create_router(downloader, Arc::new(config));

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/downloads")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );
    let methods = headers
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"), "got {methods}");
    assert!(!methods.contains("DELETE"), "got {methods}");
}

#[tokio::test]
async fn test_cors_specific_origin() {
    let (downloader, _app, _temp_dir) = create_test_app(Script::exit(0)).await;

    let mut config = (*downloader.get_config()).clone();
    config.api.cors_enabled = true;
    config.api.cors_origins = vec!["http://localhost:3000".to_string()];
    let app = create_router(downloader, Arc::new(config));

    let allowed = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, allowed).await;
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );

    let other = Request::builder()
        .uri("/health")
        .header("Origin", "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, other).await;
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}
