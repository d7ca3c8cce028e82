//! Functional tests walking a client through login, a call, and SMS

#[path = "../common/mod.rs"]
mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;
use std::sync::Arc;
use telephony_gateway::config::Settings;
use telephony_gateway::provider::{CallStatus, MockProvider};
use telephony_gateway::services::SessionTokens;

#[tokio::test]
async fn test_otp_login_flow() {
    let provider = Arc::new(MockProvider::new());
    let settings = test_settings();
    let sessions = SessionTokens::new(&settings.session);

    let (status, sent) = send_json(
        test_app(provider.clone()),
        json_request(
            Method::POST,
            "/api/otp/send",
            json!({ "phoneNumber": "+15551234567" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let otp = sent["otp"].as_str().unwrap().to_string();
    let messages = provider.sent_messages();
    assert_eq!(
        messages[0].body,
        format!(
            "Your verification code is: {}. This code will expire in 10 minutes.",
            otp
        )
    );

    let (status, verified) = send_json(
        test_app(provider.clone()),
        json_request(
            Method::POST,
            "/api/otp/verify",
            json!({ "phoneNumber": "+15551234567", "code": otp }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let claims = sessions
        .verify_token(verified["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, "+15551234567");
    assert_eq!(claims.iss, "telephony-gateway");
}

#[tokio::test]
async fn test_verify_with_shipped_config() {
    let settings = Settings::load_with_env(
        concat!(env!("CARGO_MANIFEST_DIR"), "/config/gateway.yaml"),
        |_| None,
    )
    .unwrap();
    assert!(settings.session.secret.is_empty());

    let (status, body) = send_json(
        test_app_with(settings, Arc::new(MockProvider::new())),
        json_request(
            Method::POST,
            "/api/otp/verify",
            json!({ "phoneNumber": "+15551234567", "code": "123456" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_outbound_call_lifecycle() {
    let provider = Arc::new(MockProvider::new());

    let (status, created) = send_json(
        test_app(provider.clone()),
        json_request(
            Method::POST,
            "/api/calls/initiate",
            json!({ "toNumber": "+15557654321", "fromNumber": "client:alice" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let call_sid = created["callSid"].as_str().unwrap().to_string();

    // The provider fetches markup from the callback it was given
    let call = provider.created_calls().remove(0);
    let markup_path = call.url.trim_start_matches("http://gateway.test");
    let (status, markup) = send(
        test_app(provider.clone()),
        form_request(markup_path, "To=%2B15557654321&From=%2B15550001111"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(markup.contains("<Number>+15557654321</Number>"));

    let status_path = call.status_callback.trim_start_matches("http://gateway.test");
    for event in ["initiated", "ringing", "answered"] {
        let (status, _) = send(
            test_app(provider.clone()),
            form_request(
                status_path,
                &format!("CallSid={}&CallStatus={}", call_sid, event),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, ended) = send_json(
        test_app(provider.clone()),
        empty_request(Method::DELETE, &format!("/api/calls/end/{}", call_sid)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["status"], "completed");
    assert_eq!(
        provider.call_updates(),
        vec![(call_sid, CallStatus::Completed)]
    );
}

#[tokio::test]
async fn test_call_without_system_number() {
    let provider = Arc::new(MockProvider::new());
    let mut settings = test_settings();
    settings.twilio.phone_number.clear();

    let (status, body) = send_json(
        test_app_with(settings, provider.clone()),
        json_request(
            Method::POST,
            "/api/calls/initiate",
            json!({ "toNumber": "+15557654321", "fromNumber": "+15550001111" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(provider.created_calls().is_empty());
}

#[tokio::test]
async fn test_sms_round_trip() {
    let provider = Arc::new(MockProvider::new());

    let (status, _) = send_json(
        test_app(provider.clone()),
        json_request(
            Method::POST,
            "/api/messages/send",
            json!({ "toNumber": "+15557654321", "message": "Are you free?" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, reply) = send(
        test_app(provider.clone()),
        form_request("/api/messages/receive", "From=%2B15557654321&Body=Yes"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(reply.contains("We received: &quot;Yes&quot;"));
    assert_eq!(provider.sent_messages().len(), 1);
}
