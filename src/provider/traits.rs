//! Provider-facing types and the trait every telephony client implements

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::Result;

/// Lifecycle status of a call as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CallStatus {
    Queued,
    Initiated,
    Ringing,
    InProgress,
    Answered,
    Completed,
    Busy,
    Failed,
    NoAnswer,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl CallStatus {
    /// Status events a newly created call subscribes its webhook to
    pub const SUBSCRIBED_EVENTS: [CallStatus; 4] = [
        CallStatus::Initiated,
        CallStatus::Ringing,
        CallStatus::Answered,
        CallStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Queued => "queued",
            CallStatus::Initiated => "initiated",
            CallStatus::Ringing => "ringing",
            CallStatus::InProgress => "in-progress",
            CallStatus::Answered => "answered",
            CallStatus::Completed => "completed",
            CallStatus::Busy => "busy",
            CallStatus::Failed => "failed",
            CallStatus::NoAnswer => "no-answer",
            CallStatus::Canceled => "canceled",
            CallStatus::Unknown => "unknown",
        }
    }

    /// Parse a provider status string, tolerating values this crate does not model
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "queued" => CallStatus::Queued,
            "initiated" => CallStatus::Initiated,
            "ringing" => CallStatus::Ringing,
            "in-progress" => CallStatus::InProgress,
            "answered" => CallStatus::Answered,
            "completed" => CallStatus::Completed,
            "busy" => CallStatus::Busy,
            "failed" => CallStatus::Failed,
            "no-answer" => CallStatus::NoAnswer,
            "canceled" => CallStatus::Canceled,
            _ => CallStatus::Unknown,
        }
    }

    /// No further transitions follow a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CallStatus::Completed
                | CallStatus::Busy
                | CallStatus::Failed
                | CallStatus::NoAnswer
                | CallStatus::Canceled
        )
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider resource ids are plain alphanumerics, e.g. `CA0123...`.
/// Anything else must never be spliced into a resource path.
pub fn is_resource_sid(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Request for a client capability token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenRequest {
    pub identity: String,
    pub ttl_secs: u64,
}

/// Outbound call as handed to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCall {
    pub to: String,
    pub from: String,
    /// Where the provider fetches call-control markup once the call connects
    pub url: String,
    pub status_callback: String,
    pub status_callback_events: Vec<CallStatus>,
}

/// Call resource returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CallRecord {
    pub sid: String,
    pub status: CallStatus,
}

/// Outbound text message as handed to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub to: String,
    pub from: String,
    pub body: String,
}

/// Message resource returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageRecord {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Capabilities the gateway needs from a telephony provider
#[async_trait]
pub trait TelephonyProvider: Send + Sync {
    /// Provider name, for logs and health output
    fn name(&self) -> &str;

    /// Mint a signed client access token carrying a voice grant
    fn create_token(&self, request: &AccessTokenRequest) -> Result<String>;

    /// Place an outbound call
    async fn create_call(&self, call: OutboundCall) -> Result<CallRecord>;

    /// Move an existing call to a new status (e.g. `completed` to hang up)
    async fn update_call(&self, call_sid: &str, status: CallStatus) -> Result<CallRecord>;

    /// Send a text message
    async fn send_message(&self, message: OutboundMessage) -> Result<MessageRecord>;
}
