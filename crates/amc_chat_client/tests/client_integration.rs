//! Integration tests for the HTTP client: health check and ask.
//! Uses a real in-process HTTP server (no mocks).

use amc_chat_client::{Client, ClientError, Language};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral port; returns the base URL.
async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL where nothing is listening.
fn dead_url() -> String {
    let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = l.local_addr().unwrap().port();
    drop(l);
    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn health_ok() {
    let url = serve(Router::new().route(
        "/api/health",
        get(|| async { Json(json!({"status": "healthy", "version": "1.0.0"})) }),
    ))
    .await;

    Client::new(url).health().await.expect("server is healthy");
}

#[tokio::test]
async fn health_accepts_any_success_body() {
    let url = serve(Router::new().route("/api/health", get(|| async { "ok" }))).await;

    Client::new(url).health().await.expect("2xx is reachable");
}

#[tokio::test]
async fn health_non_success_status() {
    let url = serve(Router::new().route(
        "/api/health",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "message": "Health check failed"})),
            )
        }),
    ))
    .await;

    let err = Client::new(url).health().await.unwrap_err();
    assert!(matches!(err, ClientError::Server(500)), "got {:?}", err);
}

#[tokio::test]
async fn health_unreachable() {
    let err = Client::new(dead_url()).health().await.unwrap_err();
    assert!(matches!(err, ClientError::Unreachable(_)), "got {:?}", err);
}

#[tokio::test]
async fn ask_posts_message_and_language() {
    let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let url = serve(Router::new().route(
        "/api/ask",
        post(move |Json(body): Json<Value>| {
            let seen = seen_clone.clone();
            async move {
                seen.lock().unwrap().push(body);
                Json(json!({
                    "status": "success",
                    "source": "AMC News",
                    "message": "Content retrieved successfully",
                    "is_institutional": false,
                    "total_results": 1,
                    "context": [{
                        "title": "Rainy season forecast",
                        "url": "https://ameco.et/en/news/1",
                        "date": "2024-06-01T09:00:00",
                        "language": "en"
                    }]
                }))
            }
        }),
    ))
    .await;

    let answer = Client::new(url)
        .ask("weather", Language::En)
        .await
        .expect("ask should succeed");
    assert_eq!(answer.total_results, 1);
    assert_eq!(answer.context[0].title.as_deref(), Some("Rainy season forecast"));
    assert_eq!(answer.context[0].language, Language::En);

    let bodies = seen.lock().unwrap();
    assert_eq!(
        bodies.as_slice(),
        [json!({"message": "weather", "language": "en"})]
    );
}

#[tokio::test]
async fn ask_server_error_status() {
    let url = serve(Router::new().route(
        "/api/ask",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": "error", "message": "No message provided"})),
            )
        }),
    ))
    .await;

    let err = Client::new(url).ask("x", Language::Am).await.unwrap_err();
    assert!(matches!(err, ClientError::Server(400)));
    assert_eq!(err.to_string(), "Server error: 400");
}

#[tokio::test]
async fn ask_application_error_uses_message() {
    let url = serve(Router::new().route(
        "/api/ask",
        post(|| async { Json(json!({"status": "error", "message": "Invalid message format"})) }),
    ))
    .await;

    let err = Client::new(url).ask("x", Language::En).await.unwrap_err();
    match err {
        ClientError::Application(detail) => assert_eq!(detail, "Invalid message format"),
        other => panic!("expected application error, got {:?}", other),
    }
}

#[tokio::test]
async fn ask_application_error_without_message() {
    let url = serve(Router::new().route(
        "/api/ask",
        post(|| async { Json(json!({"status": "error"})) }),
    ))
    .await;

    let err = Client::new(url).ask("x", Language::En).await.unwrap_err();
    assert_eq!(err.to_string(), "Unknown error occurred");
}

#[tokio::test]
async fn ask_invalid_body() {
    let url = serve(Router::new().route("/api/ask", post(|| async { "not json" }))).await;

    let err = Client::new(url).ask("x", Language::En).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn ask_unreachable() {
    let err = Client::new(dead_url())
        .ask("x", Language::Am)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Unreachable(_)));
}
