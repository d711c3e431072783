//! Helpers shared by the unit tests.

use axum::Json;
use axum::Router;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use std::path::PathBuf;
use std::time::Duration;

/// Fresh, not yet created directory under the system temp dir.
pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("planti-test-{}", uuid::Uuid::new_v4()))
}

#[derive(Clone)]
pub enum StubReply {
    Json(serde_json::Value),
    Status(StatusCode),
    Text(&'static str),
    /// Answers with the JSON body only after the delay.
    Delayed(Duration, serde_json::Value),
}

/// Starts a local analysis server answering `reply` to any upload carrying a
/// non-empty `file` field, returns its url.
pub async fn spawn_analysis_stub(reply: StubReply) -> String {
    let app = Router::new().route(
        "/analyze",
        post(move |multipart: Multipart| {
            let reply = reply.clone();
            async move { stub_analyze(reply, multipart).await }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });
    format!("http://{addr}/analyze")
}

async fn stub_analyze(reply: StubReply, mut multipart: Multipart) -> Response {
    let mut received = 0;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            received = field.bytes().await.map(|it| it.len()).unwrap_or(0);
        }
    }
    if received == 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "file is required"})),
        )
            .into_response();
    }
    match reply {
        StubReply::Json(value) => Json(value).into_response(),
        StubReply::Status(status) => status.into_response(),
        StubReply::Text(text) => text.into_response(),
        StubReply::Delayed(delay, value) => {
            tokio::time::sleep(delay).await;
            Json(value).into_response()
        }
    }
}

/// Encodes `multipart/form-data`, returns the content type and the body.
pub fn multipart_body(
    text_fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let boundary = "planti-test-boundary";
    let mut body = Vec::new();
    for (name, value) in text_fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}
