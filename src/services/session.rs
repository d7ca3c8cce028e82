//! Session tokens handed out after a successful OTP verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::config::{SessionConfig, DEFAULT_SESSION_TTL_SECS, MAX_SESSION_TTL_SECS};
use crate::error::Result;

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Verified phone number
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
}

#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl SessionTokens {
    /// An empty secret is replaced by a random per-process one, so tokens
    /// stop verifying after a restart.
    pub fn new(config: &SessionConfig) -> Self {
        let secret = if config.secret.is_empty() {
            warn!("Session secret is not set; signing with a random per-process secret");
            let mut bytes = [0u8; 32];
            rand::thread_rng().fill_bytes(&mut bytes);
            bytes.to_vec()
        } else {
            config.secret.as_bytes().to_vec()
        };

        let ttl_secs = if (1..=MAX_SESSION_TTL_SECS).contains(&config.ttl_secs) {
            config.ttl_secs
        } else {
            warn!(ttl_secs = config.ttl_secs, "Session ttl out of range; using the default");
            DEFAULT_SESSION_TTL_SECS
        };

        Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            issuer: config.issuer.clone(),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn create_token(&self, phone_number: &str) -> Result<String> {
        let now = Utc::now();

        let claims = SessionClaims {
            sub: phone_number.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Returns claims if the token is valid and not expired
    pub fn verify_token(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        Ok(decode::<SessionClaims>(token, &self.decoding_key, &validation)?.claims)
    }
}
