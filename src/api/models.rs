//! API request and response models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

use crate::config::CredentialPresence;
use crate::provider::CallStatus;

/// Query for `GET /api/voice/token`
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
pub struct TokenQuery {
    /// Client identity; generated when omitted
    #[serde(default)]
    pub identity: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
    pub identity: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    pub request_id: String,
    /// Echo of the sent code. Not safe for production use.
    pub otp: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user_phone_number: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitiateCallRequest {
    #[serde(default)]
    pub to_number: Option<String>,
    /// Required, but calls always originate from the system number
    #[serde(default)]
    pub from_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallResponse {
    pub success: bool,
    pub call_sid: String,
    pub status: CallStatus,
}

/// Call-control parameters, accepted in the query string or a form body
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams, ToSchema)]
pub struct CallMarkupParams {
    #[serde(rename = "To", default)]
    pub to: Option<String>,
    #[serde(rename = "From", default)]
    pub from: Option<String>,
}

/// Status webhook form posted by the provider
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CallStatusForm {
    #[serde(rename = "CallSid", default)]
    pub call_sid: Option<String>,
    #[serde(rename = "CallStatus", default)]
    pub call_status: Option<String>,
    #[serde(rename = "From", default)]
    pub from: Option<String>,
    #[serde(rename = "To", default)]
    pub to: Option<String>,
    #[serde(rename = "Duration", alias = "CallDuration", default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub to_number: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub success: bool,
    pub message_sid: String,
}

/// Inbound SMS webhook form posted by the provider
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct InboundMessageForm {
    #[serde(rename = "From", default)]
    pub from: Option<String>,
    #[serde(rename = "Body", default)]
    pub body: Option<String>,
    #[serde(rename = "MessageSid", default)]
    pub message_sid: Option<String>,
}

/// Status banner with the endpoint map
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct IndexResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
    pub credentials: CredentialPresence,
}

/// Body of every failed request
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: String,
    /// Present on 404 responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
