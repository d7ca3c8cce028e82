//! Telephony Gateway
//!
//! A small HTTP API that brokers client access tokens, voice calls, SMS and
//! one-time-passcode delivery through a telephony provider.

pub mod api;
pub mod config;
pub mod error;
pub mod provider;
pub mod services;
pub mod twiml;

pub use error::{AppError, Result};

use std::sync::Arc;

use config::Settings;
use provider::TelephonyProvider;
use services::{CallController, MessagingGateway, OtpService, SessionTokens, TokenIssuer};

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<Settings>,
    pub provider: Arc<dyn TelephonyProvider>,
    pub tokens: TokenIssuer,
    pub calls: CallController,
    pub messaging: Arc<MessagingGateway>,
    pub otp: OtpService,
}

impl AppState {
    /// Wire every service to `provider`. Settings are fixed from here on.
    pub fn new(settings: Settings, provider: Arc<dyn TelephonyProvider>) -> Self {
        let system_number = settings.twilio.phone_number.clone();
        let messaging = Arc::new(MessagingGateway::new(provider.clone(), &system_number));

        Self {
            tokens: TokenIssuer::new(provider.clone()),
            calls: CallController::new(provider.clone(), &system_number),
            otp: OtpService::new(messaging.clone(), SessionTokens::new(&settings.session)),
            messaging,
            provider,
            settings: Arc::new(settings),
        }
    }
}
