//! Voice access token issuance

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::Result;
use crate::provider::access_token::DEFAULT_TTL_SECS;
use crate::provider::{AccessTokenRequest, TelephonyProvider};

/// A freshly minted client token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub identity: String,
    pub expires_in: u64,
}

pub struct TokenIssuer {
    provider: Arc<dyn TelephonyProvider>,
}

impl TokenIssuer {
    pub fn new(provider: Arc<dyn TelephonyProvider>) -> Self {
        Self { provider }
    }

    /// Issue a token for `identity`, synthesizing `user_<millis>` when none is given
    pub fn issue(&self, identity: Option<&str>) -> Result<IssuedToken> {
        let identity = match super::present(identity.map(str::trim)) {
            Some(identity) => identity.to_string(),
            None => format!("user_{}", Utc::now().timestamp_millis()),
        };

        let request = AccessTokenRequest {
            identity: identity.clone(),
            ttl_secs: DEFAULT_TTL_SECS,
        };

        let token = self.provider.create_token(&request).map_err(|e| {
            error!(identity = %identity, error = %e, "Failed to issue access token");
            e
        })?;

        info!(identity = %identity, "Issued voice access token");

        Ok(IssuedToken {
            token,
            identity,
            expires_in: DEFAULT_TTL_SECS,
        })
    }
}
