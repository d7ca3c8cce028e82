//! Application error type and its HTTP rendering

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, AppError>;

/// Every failure a handler can produce
#[derive(Error, Debug)]
pub enum AppError {
    /// A required field is missing or the request body could not be read
    #[error("{0}")]
    Validation(String),

    /// The OTP structural check rejected the code
    #[error("{0}")]
    VerificationFailed(String),

    #[error("Route not found")]
    NotFound { path: String },

    /// The telephony provider answered with an error document
    #[error("{0}")]
    Provider(String),

    #[error("Provider request failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a configuration error carrying a plain message
    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config(config::ConfigError::Message(message.into()))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::VerificationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Provider(_)
            | AppError::HttpClient(_)
            | AppError::Config(_)
            | AppError::Token(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable name of the error class
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::VerificationFailed(_) => "verification_failed",
            AppError::NotFound { .. } => "not_found",
            AppError::Provider(_) | AppError::HttpClient(_) => "provider_error",
            AppError::Config(_) => "configuration_error",
            AppError::Token(_) => "token_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Message exposed to the caller. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(kind = self.kind(), error = %self, "Request failed");
        }

        let body = match &self {
            AppError::NotFound { path } => json!({
                "success": false,
                "message": self.public_message(),
                "error": self.kind(),
                "path": path,
            }),
            _ => json!({
                "success": false,
                "message": self.public_message(),
                "error": self.kind(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
