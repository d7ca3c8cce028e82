//! Shared helpers for driving the router with an in-memory provider

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use telephony_gateway::api::routes::create_router;
use telephony_gateway::config::Settings;
use telephony_gateway::provider::MockProvider;
use telephony_gateway::AppState;
use tower::ServiceExt;

pub const SYSTEM_NUMBER: &str = "+15550001111";

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.twilio.phone_number = SYSTEM_NUMBER.to_string();
    settings.session.secret = "test-session-secret".to_string();
    settings
}

pub fn test_app(provider: Arc<MockProvider>) -> Router {
    test_app_with(test_settings(), provider)
}

pub fn test_app_with(settings: Settings, provider: Arc<MockProvider>) -> Router {
    let state = Arc::new(AppState::new(settings, provider));
    create_router(state)
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "gateway.test")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send one request and return the status with the raw body text
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    (status, serde_json::from_str(&body).unwrap())
}
