//! HTTP surface tests over the assembled router
//!
//! These run against the in-memory index backend and only exercise paths
//! that never reach an external service: health, request validation, and
//! the always-succeeds delete contract.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::util::ServiceExt;

use lucidnote::config::{IndexBackend, NotebookConfig};
use lucidnote::server::NotebookServer;

fn test_router() -> axum::Router {
    let mut config = NotebookConfig::default();
    config.vector_index.backend = IndexBackend::Memory;

    NotebookServer::new(config)
        .expect("server construction should not require external services")
        .build_router()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

#[tokio::test]
async fn health_returns_ok() {
    let router = test_router();

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_with_blank_query_is_rejected() {
    let router = test_router();

    let response = router
        .oneshot(
            Request::post("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"query": "   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn ingest_without_url_is_rejected() {
    let router = test_router();

    let response = router
        .oneshot(
            Request::post("/ingest")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"type": "web"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ingest_with_unknown_type_is_rejected() {
    let router = test_router();

    let response = router
        .oneshot(
            Request::post("/ingest")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"type": "carrier-pigeon", "url": "x"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pdf_over_json_is_rejected_with_guidance() {
    let router = test_router();

    let response = router
        .oneshot(
            Request::post("/ingest")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"type": "pdf", "url": "file.pdf"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("multipart"));
}

#[tokio::test]
async fn unreadable_pdf_upload_is_rejected_and_writes_nothing() {
    let router = test_router();

    let boundary = "test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"bad.pdf\"\r\n\
         Content-Type: application/pdf\r\n\r\nnot a pdf\r\n--{b}--\r\n",
        b = boundary
    );

    let response = router
        .oneshot(
            Request::post("/ingest")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_with_missing_query_field_is_rejected() {
    let router = test_router();

    let response = router
        .oneshot(
            Request::post("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_note_is_rejected() {
    let router = test_router();

    let response = router
        .oneshot(
            Request::post("/notes")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"content": ""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_of_unknown_source_still_succeeds() {
    let router = test_router();

    let response = router
        .oneshot(
            Request::delete("/ingest?id=https%3A%2F%2Fexample.com%2Fmissing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn info_describes_the_surface() {
    let router = test_router();

    let response = router
        .oneshot(Request::get("/info").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "lucidnote");
}
