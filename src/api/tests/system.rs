use super::*;

#[tokio::test]
async fn health_reports_ok() {
    let (_downloader, app, _dir) = create_test_app(Script::exit(0)).await;

    let response = send(&app, get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["accepting"], true);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (_downloader, app, _dir) = create_test_app(Script::exit(0)).await;

    let response = send(&app, get("/openapi.json")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["paths"]["/downloads"].is_object());
    assert!(body["paths"]["/downloads/{id}/progress"].is_object());
}

#[tokio::test]
async fn event_stream_is_text_event_stream() {
    let (_downloader, app, _dir) = create_test_app(Script::exit(0)).await;

    let response = send(&app, get("/events")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );
}
