//! Outbound calls, hang-up, call-control markup, and status webhooks

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{AppError, Result};
use crate::provider::{
    is_resource_sid, CallRecord, CallStatus, OutboundCall, TelephonyProvider,
};
use crate::twiml::{Dial, Say, VoiceResponse};

/// Seconds the bridged leg rings before the dial gives up
pub const DIAL_TIMEOUT_SECS: u32 = 30;

pub const NO_DESTINATION_MESSAGE: &str =
    "Sorry, no destination number was provided. Please try again.";

/// Callback endpoints the provider is pointed at for a new call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackUrls {
    pub markup: String,
    pub status: String,
}

impl CallbackUrls {
    /// Build callbacks under `base`, e.g. `https://gateway.example.com`
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            markup: format!("{}/api/calls/twiml", base),
            status: format!("{}/api/calls/status", base),
        }
    }
}

/// Status webhook payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStatusEvent {
    pub call_sid: Option<String>,
    pub status: CallStatus,
    pub from: Option<String>,
    pub to: Option<String>,
    pub duration_secs: Option<u32>,
}

/// Markup for an inbound leg.
///
/// A destination number is the only thing that decides between bridging
/// and the spoken apology.
pub fn render_call_markup(to: Option<&str>, caller_id: &str) -> VoiceResponse {
    match super::present(to) {
        Some(number) => {
            let mut dial = Dial::new(number)
                .answer_on_bridge(true)
                .timeout(DIAL_TIMEOUT_SECS);
            if !caller_id.is_empty() {
                dial = dial.caller_id(caller_id);
            }
            VoiceResponse::new().dial(dial)
        }
        None => VoiceResponse::new().say(Say::new(NO_DESTINATION_MESSAGE)),
    }
}

pub struct CallController {
    provider: Arc<dyn TelephonyProvider>,
    caller_id: String,
}

impl CallController {
    /// `caller_id` is the system number every call originates from
    pub fn new(provider: Arc<dyn TelephonyProvider>, caller_id: impl Into<String>) -> Self {
        Self {
            provider,
            caller_id: caller_id.into(),
        }
    }

    /// Place a call to `to`.
    ///
    /// `from` must be supplied but the call always originates from the
    /// configured system number.
    pub async fn initiate(
        &self,
        to: Option<&str>,
        from: Option<&str>,
        callbacks: CallbackUrls,
    ) -> Result<CallRecord> {
        let (to, from) = match (super::present(to), super::present(from)) {
            (Some(to), Some(from)) => (to, from),
            _ => {
                return Err(AppError::Validation(
                    "toNumber and fromNumber are required".to_string(),
                ))
            }
        };

        if self.caller_id.is_empty() {
            return Err(AppError::config("System phone number is not configured"));
        }

        info!(
            to = %to,
            requested_from = %from,
            caller_id = %self.caller_id,
            "Initiating outbound call"
        );

        let call = OutboundCall {
            to: to.to_string(),
            from: self.caller_id.clone(),
            url: callbacks.markup,
            status_callback: callbacks.status,
            status_callback_events: CallStatus::SUBSCRIBED_EVENTS.to_vec(),
        };

        let record = self.provider.create_call(call).await.map_err(|e| {
            error!(to = %to, error = %e, "Failed to initiate call");
            e
        })?;

        info!(call_sid = %record.sid, status = %record.status, "Call initiated");
        Ok(record)
    }

    /// Hang up a call by moving it to `completed`
    pub async fn end(&self, call_sid: Option<&str>) -> Result<CallRecord> {
        let call_sid = super::present(call_sid.map(str::trim))
            .ok_or_else(|| AppError::Validation("callSid is required".to_string()))?;

        if !is_resource_sid(call_sid) {
            warn!(call_sid = %call_sid, "Rejected malformed call sid");
            return Err(AppError::Validation("callSid is invalid".to_string()));
        }

        let record = self
            .provider
            .update_call(call_sid, CallStatus::Completed)
            .await
            .map_err(|e| {
                error!(call_sid = %call_sid, error = %e, "Failed to end call");
                e
            })?;

        info!(call_sid = %record.sid, status = %record.status, "Call ended");
        Ok(record)
    }

    pub fn render_markup(&self, to: Option<&str>, from: Option<&str>) -> VoiceResponse {
        info!(to = ?to, from = ?from, "Rendering call markup");
        render_call_markup(to, &self.caller_id)
    }

    /// Log a status webhook. Nothing is tracked across events.
    pub fn record_status(&self, event: &CallStatusEvent) {
        if event.status == CallStatus::Unknown {
            warn!(call_sid = ?event.call_sid, "Call status webhook with unrecognized status");
        }

        info!(
            call_sid = ?event.call_sid,
            status = %event.status,
            from = ?event.from,
            to = ?event.to,
            duration_secs = ?event.duration_secs,
            terminal = event.status.is_terminal(),
            "Call status update"
        );
    }
}
