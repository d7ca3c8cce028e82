//! HTTP route definitions

use crate::api::handlers;
use crate::api::models::*;
use crate::config::CredentialPresence;
use crate::error::AppError;
use crate::provider::CallStatus;
use axum::{
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Telephony Gateway API",
        version = "0.1.0",
        description = "Access tokens, voice calls, SMS and OTP delivery brokered through a telephony provider.",
        license(name = "MIT"),
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        handlers::index,
        handlers::health_check,
        handlers::voice_token,
        handlers::send_otp,
        handlers::verify_otp,
        handlers::initiate_call,
        handlers::end_call,
        handlers::call_markup,
        handlers::call_status,
        handlers::send_message,
        handlers::receive_message,
    ),
    components(schemas(
        TokenResponse,
        SendOtpRequest,
        SendOtpResponse,
        VerifyOtpRequest,
        VerifyOtpResponse,
        InitiateCallRequest,
        CallResponse,
        CallMarkupParams,
        CallStatusForm,
        SendMessageRequest,
        SendMessageResponse,
        InboundMessageForm,
        IndexResponse,
        HealthResponse,
        ErrorResponse,
        CredentialPresence,
        CallStatus,
    )),
    tags(
        (name = "Voice", description = "Client access tokens"),
        (name = "Calls", description = "Outbound calls and call-control webhooks"),
        (name = "Messages", description = "SMS sending and inbound webhooks"),
        (name = "OTP", description = "One-time passcode delivery and verification"),
        (name = "Health", description = "Health and status endpoints"),
    )
)]
pub struct ApiDoc;

/// Render a handler panic as the generic 500 body
fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    AppError::Internal("handler panicked".to_string()).into_response()
}

/// Request tracing, panic recovery and CORS, outermost first
pub fn with_middleware(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(CorsLayer::permissive()),
    )
}

/// Create the main application router
pub fn create_router(state: Arc<crate::AppState>) -> Router {
    let api_routes = Router::new()
        .route("/voice/token", get(handlers::voice_token))
        .route("/otp/send", post(handlers::send_otp))
        .route("/otp/verify", post(handlers::verify_otp))
        .route("/calls/initiate", post(handlers::initiate_call))
        .route("/calls/end", delete(handlers::end_call_missing_sid))
        .route("/calls/end/:call_sid", delete(handlers::end_call))
        .route("/calls/twiml", post(handlers::call_markup))
        .route("/calls/status", post(handlers::call_status))
        .route("/messages/send", post(handlers::send_message))
        .route("/messages/receive", post(handlers::receive_message))
        .method_not_allowed_fallback(handlers::not_found);

    // A known path with the wrong method is reported like an unknown path
    let router = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .method_not_allowed_fallback(handlers::not_found)
        .fallback(handlers::not_found)
        .with_state(state);

    with_middleware(router)
}
