//! One-time passcode delivery and the placeholder verification flow
//!
//! Codes are not stored. Verification only checks that the submitted code has
//! [`OTP_LENGTH`] characters, and `send` hands the code back to the caller.
//! Both are known weaknesses kept as-is; neither is safe for production.

use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::services::messaging::MessagingGateway;
use crate::services::session::SessionTokens;

pub const OTP_LENGTH: usize = 6;

/// Advertised in the SMS only; nothing enforces it
pub const OTP_VALIDITY_MINUTES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentOtp {
    /// Provider sid of the SMS carrying the code
    pub request_id: String,
    pub otp: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedOtp {
    pub token: String,
    pub phone_number: String,
}

/// Uniformly random code in `100000..=999999`
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

pub fn otp_message(code: &str) -> String {
    format!(
        "Your verification code is: {}. This code will expire in {} minutes.",
        code, OTP_VALIDITY_MINUTES
    )
}

/// Length-only check; the code is never compared against an issued one
pub fn is_structurally_valid(code: &str) -> bool {
    code.chars().count() == OTP_LENGTH
}

pub struct OtpService {
    messaging: Arc<MessagingGateway>,
    sessions: SessionTokens,
}

impl OtpService {
    pub fn new(messaging: Arc<MessagingGateway>, sessions: SessionTokens) -> Self {
        Self {
            messaging,
            sessions,
        }
    }

    pub async fn send(&self, phone_number: Option<&str>) -> Result<SentOtp> {
        let phone_number = super::present(phone_number)
            .ok_or_else(|| AppError::Validation("phoneNumber is required".to_string()))?;

        let otp = generate_code();
        let body = otp_message(&otp);
        let record = self
            .messaging
            .send(Some(phone_number), Some(body.as_str()))
            .await?;

        info!(phone_number = %phone_number, request_id = %record.sid, "OTP sent");
        warn!("OTP is echoed in the response body");

        Ok(SentOtp {
            request_id: record.sid,
            otp,
        })
    }

    pub fn verify(&self, phone_number: Option<&str>, code: Option<&str>) -> Result<VerifiedOtp> {
        let (phone_number, code) = match (super::present(phone_number), super::present(code)) {
            (Some(phone_number), Some(code)) => (phone_number, code),
            _ => {
                return Err(AppError::Validation(
                    "phoneNumber and code are required".to_string(),
                ))
            }
        };

        if !is_structurally_valid(code) {
            info!(phone_number = %phone_number, "OTP rejected");
            return Err(AppError::VerificationFailed("Invalid OTP".to_string()));
        }

        let token = self.sessions.create_token(phone_number)?;
        info!(phone_number = %phone_number, "OTP accepted");

        Ok(VerifiedOtp {
            token,
            phone_number: phone_number.to_string(),
        })
    }
}
