mod device;
mod photo;

use crate::middlewares::trace_id::{TraceId, TraceIdLayer};
use crate::state::AppState;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post},
};
use std::time::Duration;
use tracing::Span;

pub fn build(body_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/api/health", get(|| async { axum::http::StatusCode::OK }))
        .route(
            "/api/version",
            get(|| async { format!("planti_{}", env!("CARGO_PKG_VERSION")) }),
        )
        // ======== device ========
        .route("/api/devices", post(device::register))
        // ======== photo ========
        .route("/api/photos", post(photo::upload))
        .route("/api/photos/latest", get(photo::latest))
        .route("/api/photos/{id}", get(photo::get))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| match request.extensions().get::<TraceId>() {
                    Some(trace_id) => tracing::debug_span!("request", trace_id = %trace_id),
                    None => tracing::debug_span!("request"),
                })
                .on_request(|req: &Request<Body>, _span: &Span| {
                    tracing::trace!(
                        method = %req.method(),
                        uri = %req.uri(),
                        version = %format!("{:?}", req.version()),
                        "started processing request"
                    );
                })
                .on_response(|res: &Response, latency: Duration, _span: &Span| {
                    tracing::trace!(
                        status = ?res.status(),
                        latency = %format!("{}ms", latency.as_millis()),
                        "finished processing request"
                    );
                }),
        )
        .layer(TraceIdLayer::new())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .expose_headers(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::connect_memory_database;
    use crate::test_support::{StubReply, multipart_body, spawn_analysis_stub, temp_dir};
    use axum::http::{StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn app(analysis_url: &str) -> Router {
        app_with_timeout(analysis_url, 5).await
    }

    async fn app_with_timeout(analysis_url: &str, timeout_secs: u64) -> Router {
        let upload_dir = temp_dir();
        let config = Config::from_toml(&format!(
            r#"
            [server]
            host = "127.0.0.1"
            port = 0
            [storage]
            upload_dir = "{}"
            database = ":memory:"
            [analysis]
            url = "{analysis_url}"
            timeout_secs = {timeout_secs}
            [logs]
            level = "debug"
            "#,
            upload_dir.display()
        ))
        .unwrap();
        let state = AppState::build(connect_memory_database().await, &config).unwrap();
        build(config.server.body_limit()).with_state(state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    fn register(serial_number: &str) -> Request<Body> {
        Request::post("/api/devices")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "serialNumber": serial_number }).to_string(),
            ))
            .unwrap()
    }

    fn upload(serial_number: &str, image: &[u8]) -> Request<Body> {
        let (content_type, body) = multipart_body(
            &[("serialNumber", serial_number)],
            Some(("imageFile", "leaf.jpg", image)),
        );
        Request::post("/api/photos")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    fn latest() -> Request<Body> {
        Request::get("/api/photos/latest")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_and_query_latest() {
        let url =
            spawn_analysis_stub(StubReply::Json(json!({"objectName": "bug", "confidence": 0.87})))
                .await;
        let app = app(&url).await;

        let (status, _) = send(&app, latest()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, device) = send(&app, register("SN-001")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(device["serialNumber"], "SN-001");

        let (status, photo) = send(&app, upload("SN-001", b"jpeg-bytes")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(photo["analysisResult"], "bug");
        assert_eq!(photo["confidence"], 0.87);
        assert!(photo["fileName"].as_str().unwrap().ends_with(".jpg"));

        let (status, found) = send(&app, latest()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, photo);

        let request = Request::get(format!("/api/photos/{}", photo["id"]))
            .body(Body::empty())
            .unwrap();
        let (status, found) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, photo);
    }

    #[tokio::test]
    async fn test_upload_survives_unreachable_analysis_server() {
        let app = app("http://127.0.0.1:1/analyze").await;
        send(&app, register("SN-001")).await;

        let (status, photo) = send(&app, upload("SN-001", b"jpeg-bytes")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(photo["analysisResult"], Value::Null);
        assert_eq!(photo["confidence"], Value::Null);
        assert!(photo["id"].is_i64());
    }

    #[tokio::test]
    async fn test_upload_survives_analysis_timeout() {
        let url = spawn_analysis_stub(StubReply::Delayed(
            std::time::Duration::from_secs(3),
            json!({"objectName": "bug", "confidence": 0.87}),
        ))
        .await;
        let app = app_with_timeout(&url, 1).await;
        send(&app, register("SN-001")).await;

        let (status, photo) = send(&app, upload("SN-001", b"jpeg-bytes")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(photo["analysisResult"], Value::Null);
        assert_eq!(photo["confidence"], Value::Null);

        let (status, found) = send(&app, latest()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, photo);
    }

    #[tokio::test]
    async fn test_upload_errors() {
        let app = app("http://127.0.0.1:1/analyze").await;
        send(&app, register("SN-001")).await;

        let (status, _) = send(&app, upload("SN-001", b"")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, upload("SN-404", b"jpeg-bytes")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (content_type, body) = multipart_body(&[("serialNumber", "SN-001")], None);
        let request = Request::post("/api/photos")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, register("SN-001")).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(&app, latest()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let app = app("http://127.0.0.1:1/analyze").await;
        let request_id = "0b6f2b1e-7c1d-4c58-9a57-1d1f3e2c4b5a";
        let request = Request::get("/api/health")
            .header("x-request-id", request_id)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], request_id);
    }

    #[tokio::test]
    async fn test_version() {
        let app = app("http://127.0.0.1:1/analyze").await;
        let request = Request::get("/api/version").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, format!("planti_{}", env!("CARGO_PKG_VERSION")));
    }
}
