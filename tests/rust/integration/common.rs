use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlgate::{
    config::ServerConfig,
    gateway::Store,
    server::{build_router, AppState},
};
use tower::ServiceExt;

pub fn test_app() -> Router {
    app_with_store(Store::open_in_memory().expect("in-memory store"))
}

pub fn app_with_store(store: Store) -> Router {
    app_with_config(store, ServerConfig::default())
}

pub fn app_with_config(store: Store, config: ServerConfig) -> Router {
    build_router(AppState::new(store, config))
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send_with_headers(app, request).await;
    (status, body)
}

pub async fn send_with_headers(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.expect("router response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "expected JSON envelope, got {:?} ({})",
            String::from_utf8_lossy(&bytes),
            e
        )
    });
    (status, headers, body)
}

pub fn query_request(sql: &str, args: Value) -> Request<Body> {
    let body = serde_json::json!({ "sql": sql, "args": args }).to_string();
    Request::post("/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request")
}

pub async fn post_raw(app: &Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::post("/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request");
    send(app, request).await
}

pub async fn query(app: &Router, sql: &str, args: Value) -> (StatusCode, Value) {
    send(app, query_request(sql, args)).await
}

/// Assert a failure envelope and return its message.
pub fn expect_error(status: StatusCode, body: &Value, code: u16) -> String {
    assert_eq!(status.as_u16(), code, "unexpected status for {}", body);
    assert_eq!(body["ok"], false);
    assert!(body.get("data").is_none(), "failure must not carry data: {}", body);
    assert_eq!(body["error"]["code"], code);
    let message = body["error"]["message"]
        .as_str()
        .expect("error message")
        .to_string();
    assert!(!message.is_empty());
    message
}
