//! Outbound SMS and inbound auto-replies

use std::sync::Arc;
use tracing::{error, info};

use crate::error::{AppError, Result};
use crate::provider::{MessageRecord, OutboundMessage, TelephonyProvider};
use crate::twiml::MessagingResponse;

/// Inbound SMS webhook payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundMessage {
    pub from: Option<String>,
    pub body: Option<String>,
    pub message_sid: Option<String>,
}

/// Acknowledgement echoing what was received
pub fn render_auto_reply(inbound_body: &str) -> MessagingResponse {
    MessagingResponse::new().message(format!(
        "Thanks for your message! We received: \"{}\"",
        inbound_body
    ))
}

pub struct MessagingGateway {
    provider: Arc<dyn TelephonyProvider>,
    sender: String,
}

impl MessagingGateway {
    /// `sender` is the system number every message is sent from
    pub fn new(provider: Arc<dyn TelephonyProvider>, sender: impl Into<String>) -> Self {
        Self {
            provider,
            sender: sender.into(),
        }
    }

    pub async fn send(&self, to: Option<&str>, body: Option<&str>) -> Result<MessageRecord> {
        let (to, body) = match (super::present(to), super::present(body)) {
            (Some(to), Some(body)) => (to, body),
            _ => {
                return Err(AppError::Validation(
                    "toNumber and message are required".to_string(),
                ))
            }
        };

        if self.sender.is_empty() {
            return Err(AppError::config("System phone number is not configured"));
        }

        let message = OutboundMessage {
            to: to.to_string(),
            from: self.sender.clone(),
            body: body.to_string(),
        };

        let record = self.provider.send_message(message).await.map_err(|e| {
            error!(to = %to, error = %e, "Failed to send message");
            e
        })?;

        info!(to = %to, message_sid = %record.sid, "Message sent");
        Ok(record)
    }

    pub fn receive(&self, inbound: &InboundMessage) -> MessagingResponse {
        info!(
            from = ?inbound.from,
            message_sid = ?inbound.message_sid,
            "Received inbound message"
        );
        render_auto_reply(inbound.body.as_deref().unwrap_or_default())
    }
}
