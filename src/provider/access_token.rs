//! Client access tokens with a voice grant
//!
//! The token is an HS256 JWT signed with the API key secret. The provider
//! recognizes it by the `twilio-fpa;v=1` content type in the header.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const ACCESS_TOKEN_CONTENT_TYPE: &str = "twilio-fpa;v=1";

/// Default lifetime of a client access token
pub const DEFAULT_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingGrant {
    pub allow: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingGrant {
    pub application_sid: String,
}

/// Voice capability: receive calls and/or place them through a call-control app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceGrant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incoming: Option<IncomingGrant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outgoing: Option<OutgoingGrant>,
}

impl VoiceGrant {
    /// Grant allowing inbound calls and outbound calls via `application_sid`
    pub fn inbound_and_outbound(application_sid: impl Into<String>) -> Self {
        Self {
            incoming: Some(IncomingGrant { allow: true }),
            outgoing: Some(OutgoingGrant {
                application_sid: application_sid.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grants {
    pub identity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceGrant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub jti: String,
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub grants: Grants,
}

/// Builder for a signed client access token
#[derive(Debug, Clone)]
pub struct AccessToken {
    account_sid: String,
    api_key_sid: String,
    api_key_secret: String,
    identity: String,
    ttl_secs: u64,
    voice: Option<VoiceGrant>,
}

impl AccessToken {
    pub fn new(
        account_sid: impl Into<String>,
        api_key_sid: impl Into<String>,
        api_key_secret: impl Into<String>,
        identity: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            api_key_sid: api_key_sid.into(),
            api_key_secret: api_key_secret.into(),
            identity: identity.into(),
            ttl_secs: DEFAULT_TTL_SECS,
            voice: None,
        }
    }

    pub fn ttl(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn voice_grant(mut self, grant: VoiceGrant) -> Self {
        self.voice = Some(grant);
        self
    }

    /// Claims as they would be issued at unix time `now`
    pub fn claims_at(&self, now: i64) -> AccessTokenClaims {
        AccessTokenClaims {
            jti: format!("{}-{}", self.api_key_sid, now),
            iss: self.api_key_sid.clone(),
            sub: self.account_sid.clone(),
            iat: now,
            nbf: now,
            exp: now + self.ttl_secs as i64,
            grants: Grants {
                identity: self.identity.clone(),
                voice: self.voice.clone(),
            },
        }
    }

    /// Sign the token
    pub fn to_jwt(&self) -> Result<String> {
        let missing: Vec<&str> = [
            ("account sid", self.account_sid.is_empty()),
            ("API key sid", self.api_key_sid.is_empty()),
            ("API key secret", self.api_key_secret.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, empty)| empty.then_some(name))
        .collect();

        if !missing.is_empty() {
            return Err(AppError::config(format!(
                "Cannot sign access token, missing {}",
                missing.join(", ")
            )));
        }

        if let Some(VoiceGrant {
            outgoing: Some(outgoing),
            ..
        }) = &self.voice
        {
            if outgoing.application_sid.is_empty() {
                return Err(AppError::config(
                    "Cannot sign access token, missing call-control application sid",
                ));
            }
        }

        let mut header = Header::new(Algorithm::HS256);
        header.cty = Some(ACCESS_TOKEN_CONTENT_TYPE.to_string());

        let claims = self.claims_at(Utc::now().timestamp());
        let key = EncodingKey::from_secret(self.api_key_secret.as_bytes());

        Ok(encode(&header, &claims, &key)?)
    }
}
