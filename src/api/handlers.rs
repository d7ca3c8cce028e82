//! HTTP request handlers

use crate::api::models::{
    CallMarkupParams, CallResponse, CallStatusForm, ErrorResponse, HealthResponse,
    InboundMessageForm, IndexResponse, InitiateCallRequest, SendMessageRequest,
    SendMessageResponse, SendOtpRequest, SendOtpResponse, TokenQuery, TokenResponse,
    VerifyOtpRequest, VerifyOtpResponse,
};
use crate::config::Settings;
use crate::error::AppError;
use crate::provider::CallStatus;
use crate::services::{CallStatusEvent, CallbackUrls, InboundMessage};
use crate::twiml::Twiml;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, Query, State},
    http::{header::HOST, HeaderMap, StatusCode},
    Form, Json,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Unreadable JSON bodies are reported like missing fields
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// Base URL the provider should call back on
fn callback_base(settings: &Settings, headers: &HeaderMap) -> String {
    if let Some(base) = &settings.server.public_base_url {
        return base.clone();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");

    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{}", settings.server.port));

    format!("{}://{}", scheme, host)
}

/// Status banner and endpoint map
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Service banner", body = IndexResponse))
)]
pub async fn index() -> Json<IndexResponse> {
    let endpoints: BTreeMap<String, String> = [
        ("voiceToken", "GET /api/voice/token"),
        ("sendOtp", "POST /api/otp/send"),
        ("verifyOtp", "POST /api/otp/verify"),
        ("initiateCall", "POST /api/calls/initiate"),
        ("endCall", "DELETE /api/calls/end/:callSid"),
        ("callMarkup", "POST /api/calls/twiml"),
        ("callStatus", "POST /api/calls/status"),
        ("sendMessage", "POST /api/messages/send"),
        ("receiveMessage", "POST /api/messages/receive"),
        ("health", "GET /health"),
    ]
    .into_iter()
    .map(|(name, route)| (name.to_string(), route.to_string()))
    .collect();

    Json(IndexResponse {
        status: "ok".to_string(),
        message: "Telephony gateway is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.provider.name().to_string(),
        credentials: state.settings.twilio.presence(),
    })
}

/// Issue a voice access token
#[utoipa::path(
    get,
    path = "/api/voice/token",
    tag = "Voice",
    params(TokenQuery),
    responses(
        (status = 200, description = "Signed access token", body = TokenResponse),
        (status = 500, description = "Signing or configuration failure", body = ErrorResponse),
    )
)]
pub async fn voice_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TokenResponse>, AppError> {
    let issued = state.tokens.issue(query.identity.as_deref())?;

    Ok(Json(TokenResponse {
        success: true,
        token: issued.token,
        identity: issued.identity,
        expires_in: issued.expires_in,
    }))
}

/// Send a one-time passcode by SMS
#[utoipa::path(
    post,
    path = "/api/otp/send",
    tag = "OTP",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Code sent", body = SendOtpResponse),
        (status = 400, description = "Missing phone number", body = ErrorResponse),
        (status = 500, description = "Provider failure", body = ErrorResponse),
    )
)]
pub async fn send_otp(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> Result<Json<SendOtpResponse>, AppError> {
    let request = json_body(payload)?;
    let sent = state.otp.send(request.phone_number.as_deref()).await?;

    Ok(Json(SendOtpResponse {
        success: true,
        message: "OTP sent successfully".to_string(),
        request_id: sent.request_id,
        otp: sent.otp,
    }))
}

/// Verify a one-time passcode (length check only)
#[utoipa::path(
    post,
    path = "/api/otp/verify",
    tag = "OTP",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Code accepted", body = VerifyOtpResponse),
        (status = 400, description = "Missing fields or invalid code", body = ErrorResponse),
    )
)]
pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<Json<VerifyOtpResponse>, AppError> {
    let request = json_body(payload)?;
    let verified = state
        .otp
        .verify(request.phone_number.as_deref(), request.code.as_deref())?;

    Ok(Json(VerifyOtpResponse {
        success: true,
        message: "OTP verified successfully".to_string(),
        token: verified.token,
        user_phone_number: verified.phone_number,
    }))
}

/// Place an outbound call
#[utoipa::path(
    post,
    path = "/api/calls/initiate",
    tag = "Calls",
    request_body = InitiateCallRequest,
    responses(
        (status = 200, description = "Call created", body = CallResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 500, description = "Provider failure", body = ErrorResponse),
    )
)]
pub async fn initiate_call(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<InitiateCallRequest>, JsonRejection>,
) -> Result<Json<CallResponse>, AppError> {
    let request = json_body(payload)?;
    let callbacks = CallbackUrls::from_base(&callback_base(&state.settings, &headers));

    let record = state
        .calls
        .initiate(
            request.to_number.as_deref(),
            request.from_number.as_deref(),
            callbacks,
        )
        .await?;

    Ok(Json(CallResponse {
        success: true,
        call_sid: record.sid,
        status: record.status,
    }))
}

/// Hang up an active call
#[utoipa::path(
    delete,
    path = "/api/calls/end/{callSid}",
    tag = "Calls",
    params(("callSid" = String, Path, description = "Provider call identifier")),
    responses(
        (status = 200, description = "Call completed", body = CallResponse),
        (status = 400, description = "Missing or malformed call sid", body = ErrorResponse),
        (status = 500, description = "Provider failure", body = ErrorResponse),
    )
)]
pub async fn end_call(
    State(state): State<Arc<AppState>>,
    Path(call_sid): Path<String>,
) -> Result<Json<CallResponse>, AppError> {
    let record = state.calls.end(Some(&call_sid)).await?;

    Ok(Json(CallResponse {
        success: true,
        call_sid: record.sid,
        status: record.status,
    }))
}

/// `DELETE /api/calls/end` without a call sid
pub async fn end_call_missing_sid() -> AppError {
    AppError::Validation("callSid is required".to_string())
}

/// Call-control markup for an inbound leg
#[utoipa::path(
    post,
    path = "/api/calls/twiml",
    tag = "Calls",
    params(CallMarkupParams),
    responses((status = 200, description = "Call-control markup", content_type = "text/xml", body = String))
)]
pub async fn call_markup(
    State(state): State<Arc<AppState>>,
    query: Option<Query<CallMarkupParams>>,
    form: Option<Form<CallMarkupParams>>,
) -> Twiml {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let form = form.map(|Form(form)| form).unwrap_or_default();

    let to = query
        .to
        .filter(|v| !v.is_empty())
        .or(form.to);
    let from = query
        .from
        .filter(|v| !v.is_empty())
        .or(form.from);

    state
        .calls
        .render_markup(to.as_deref(), from.as_deref())
        .into()
}

/// Status webhook; logged and acknowledged
#[utoipa::path(
    post,
    path = "/api/calls/status",
    tag = "Calls",
    request_body(content = CallStatusForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 200, description = "Acknowledged"))
)]
pub async fn call_status(
    State(state): State<Arc<AppState>>,
    form: Option<Form<CallStatusForm>>,
) -> StatusCode {
    let form = form.map(|Form(form)| form).unwrap_or_default();

    let event = CallStatusEvent {
        call_sid: form.call_sid,
        status: form
            .call_status
            .as_deref()
            .map(CallStatus::parse)
            .unwrap_or(CallStatus::Unknown),
        from: form.from,
        to: form.to,
        duration_secs: form.duration.and_then(|d| d.trim().parse().ok()),
    };

    state.calls.record_status(&event);
    StatusCode::OK
}

/// Send an SMS
#[utoipa::path(
    post,
    path = "/api/messages/send",
    tag = "Messages",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message queued", body = SendMessageResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 500, description = "Provider failure", body = ErrorResponse),
    )
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, AppError> {
    let request = json_body(payload)?;
    let record = state
        .messaging
        .send(request.to_number.as_deref(), request.message.as_deref())
        .await?;

    Ok(Json(SendMessageResponse {
        success: true,
        message_sid: record.sid,
    }))
}

/// Inbound SMS webhook; answers with an auto-reply
#[utoipa::path(
    post,
    path = "/api/messages/receive",
    tag = "Messages",
    request_body(content = InboundMessageForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 200, description = "Auto-reply markup", content_type = "text/xml", body = String))
)]
pub async fn receive_message(
    State(state): State<Arc<AppState>>,
    form: Option<Form<InboundMessageForm>>,
) -> Twiml {
    let form = form.map(|Form(form)| form).unwrap_or_default();

    let inbound = InboundMessage {
        from: form.from,
        body: form.body,
        message_sid: form.message_sid,
    };

    state.messaging.receive(&inbound).into()
}

/// Fallback for unmatched routes and methods
pub async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    info!(path = %uri.path(), "Route not found");
    AppError::NotFound {
        path: uri.path().to_string(),
    }
}
