//! REST client for the Twilio voice and messaging APIs

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::config::TwilioConfig;
use crate::error::{AppError, Result};
use crate::provider::access_token::{AccessToken, VoiceGrant};
use crate::provider::traits::{
    is_resource_sid, AccessTokenRequest, CallRecord, CallStatus, MessageRecord, OutboundCall,
    OutboundMessage, TelephonyProvider,
};

const API_VERSION: &str = "2010-04-01";

/// Error document returned on non-2xx responses
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    code: Option<i64>,
    message: String,
    #[serde(default)]
    more_info: Option<String>,
}

/// Twilio-backed telephony provider
pub struct TwilioProvider {
    client: Client,
    config: TwilioConfig,
}

impl TwilioProvider {
    pub fn new(config: &TwilioConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// URL of an account-scoped resource, e.g. `Calls.json`
    fn account_url(&self, resource: &str) -> Result<String> {
        if self.config.account_sid.is_empty() || self.config.auth_token.is_empty() {
            return Err(AppError::config(
                "Provider account sid and auth token must be configured",
            ));
        }

        Ok(format!(
            "{}/{}/Accounts/{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            API_VERSION,
            self.config.account_sid,
            resource
        ))
    }

    async fn post_form<T: DeserializeOwned>(&self, url: &str, form: &[(&str, String)]) -> Result<T> {
        debug!(url = %url, "Sending provider request");

        let response = self
            .client
            .post(url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                error!(error = %e, "Failed to parse provider response");
                AppError::Provider(format!("Failed to parse provider response: {}", e))
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ProviderErrorBody>(&body) {
            Ok(err) => {
                warn!(
                    status = %status,
                    code = ?err.code,
                    more_info = ?err.more_info,
                    "Provider rejected request"
                );
                err.message
            }
            Err(_) => {
                warn!(status = %status, body = %body, "Provider returned an unreadable error");
                format!("Provider returned {}: {}", status, body)
            }
        };

        Err(AppError::Provider(message))
    }
}

#[async_trait]
impl TelephonyProvider for TwilioProvider {
    fn name(&self) -> &str {
        "twilio"
    }

    fn create_token(&self, request: &AccessTokenRequest) -> Result<String> {
        AccessToken::new(
            &self.config.account_sid,
            &self.config.api_key_sid,
            &self.config.api_key_secret,
            &request.identity,
        )
        .ttl(request.ttl_secs)
        .voice_grant(VoiceGrant::inbound_and_outbound(&self.config.twiml_app_sid))
        .to_jwt()
    }

    async fn create_call(&self, call: OutboundCall) -> Result<CallRecord> {
        let url = self.account_url("Calls.json")?;

        let mut form = vec![
            ("To", call.to),
            ("From", call.from),
            ("Url", call.url),
            ("StatusCallback", call.status_callback),
            ("StatusCallbackMethod", "POST".to_string()),
        ];
        form.extend(
            call.status_callback_events
                .iter()
                .map(|event| ("StatusCallbackEvent", event.as_str().to_string())),
        );

        self.post_form(&url, &form).await
    }

    async fn update_call(&self, call_sid: &str, status: CallStatus) -> Result<CallRecord> {
        if !is_resource_sid(call_sid) {
            return Err(AppError::Validation(format!("Invalid call sid '{}'", call_sid)));
        }
        let url = self.account_url(&format!("Calls/{}.json", call_sid))?;
        self.post_form(&url, &[("Status", status.as_str().to_string())])
            .await
    }

    async fn send_message(&self, message: OutboundMessage) -> Result<MessageRecord> {
        let url = self.account_url("Messages.json")?;
        let form = [
            ("To", message.to),
            ("From", message.from),
            ("Body", message.body),
        ];
        self.post_form(&url, &form).await
    }
}
