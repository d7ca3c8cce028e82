//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use utoipa::ToSchema;

/// Prefix for structured environment overrides, e.g. `TELEPHONY_GATEWAY__SERVER__PORT`
pub const ENV_PREFIX: &str = "TELEPHONY_GATEWAY";

/// Environment variable naming an alternative configuration file
pub const CONFIG_PATH_ENV: &str = "TELEPHONY_GATEWAY_CONFIG";

pub const DEFAULT_CONFIG_PATH: &str = "config/gateway.yaml";

pub const DEFAULT_SESSION_TTL_SECS: i64 = 86400;

/// Longest accepted session lifetime (one year)
pub const MAX_SESSION_TTL_SECS: i64 = 365 * 86400;

/// Conventional variable names mapped onto configuration keys.
/// These win over both the file and the prefixed environment.
const CONVENTIONAL_ENV: &[(&str, &str)] = &[
    ("TWILIO_ACCOUNT_SID", "twilio.account_sid"),
    ("TWILIO_AUTH_TOKEN", "twilio.auth_token"),
    ("TWILIO_API_KEY", "twilio.api_key_sid"),
    ("TWILIO_API_SECRET", "twilio.api_key_secret"),
    ("TWILIO_TWIML_APP_SID", "twilio.twiml_app_sid"),
    ("TWILIO_PHONE_NUMBER", "twilio.phone_number"),
    ("PORT", "server.port"),
];

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Externally reachable base URL used for provider callbacks.
    /// When unset, callbacks are derived from the incoming request.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Telephony provider credentials and endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: String,
    #[serde(default)]
    pub auth_token: String,
    #[serde(default)]
    pub api_key_sid: String,
    #[serde(default)]
    pub api_key_secret: String,
    /// Call-control application the voice grant routes outgoing calls through
    #[serde(default)]
    pub twiml_app_sid: String,
    /// System number used as caller id and SMS sender
    #[serde(default)]
    pub phone_number: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_api_base_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_timeout() -> u64 {
    30000
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            api_key_sid: String::new(),
            api_key_secret: String::new(),
            twiml_app_sid: String::new(),
            phone_number: String::new(),
            api_base_url: default_api_base_url(),
            timeout_ms: default_timeout(),
        }
    }
}

/// Which provider settings are present. Never carries the values themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPresence {
    pub account_sid: bool,
    pub auth_token: bool,
    pub api_key_sid: bool,
    pub api_key_secret: bool,
    pub twiml_app_sid: bool,
    pub phone_number: bool,
}

impl CredentialPresence {
    pub fn is_complete(&self) -> bool {
        self.account_sid
            && self.auth_token
            && self.api_key_sid
            && self.api_key_secret
            && self.twiml_app_sid
            && self.phone_number
    }
}

impl TwilioConfig {
    pub fn presence(&self) -> CredentialPresence {
        CredentialPresence {
            account_sid: !self.account_sid.is_empty(),
            auth_token: !self.auth_token.is_empty(),
            api_key_sid: !self.api_key_sid.is_empty(),
            api_key_secret: !self.api_key_secret.is_empty(),
            twiml_app_sid: !self.twiml_app_sid.is_empty(),
            phone_number: !self.phone_number.is_empty(),
        }
    }
}

/// Session token configuration for verified OTP logins
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: i64,
}

fn default_issuer() -> String {
    "telephony-gateway".to_string()
}

fn default_session_ttl() -> i64 {
    DEFAULT_SESSION_TTL_SECS
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load settings from the default configuration file and the process environment
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load settings, resolving conventional variable names through `lookup`
    pub fn load_with_env<P, F>(path: P, lookup: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();

        let format = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("json") => FileFormat::Json,
            _ => FileFormat::Yaml,
        };

        let mut builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("twilio.api_base_url", default_api_base_url())?
            .set_default("twilio.timeout_ms", default_timeout() as i64)?
            .set_default("session.secret", "")?
            .set_default("session.issuer", default_issuer())?
            .set_default("session.ttl_secs", default_session_ttl())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?;

        if path.exists() {
            builder = builder.add_source(File::from(path).format(format));
        }

        // No try_parsing: phone numbers like "+15551234567" must stay strings.
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        for (var, key) in CONVENTIONAL_ENV {
            builder = builder.set_override_option(*key, lookup(var).filter(|v| !v.is_empty()))?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration.
    ///
    /// Missing provider credentials are tolerated here; they surface per request.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::config("Server port cannot be 0"));
        }

        if let Some(base) = &self.server.public_base_url {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(AppError::config(format!(
                    "public_base_url must be an http(s) URL, got '{}'",
                    base
                )));
            }
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(AppError::config(format!(
                "Unknown logging format '{}'",
                self.logging.format
            )));
        }

        if self.twilio.timeout_ms == 0 {
            return Err(AppError::config("Provider timeout cannot be 0"));
        }

        if !(1..=MAX_SESSION_TTL_SECS).contains(&self.session.ttl_secs) {
            return Err(AppError::config(format!(
                "Session ttl must be between 1 and {} seconds",
                MAX_SESSION_TTL_SECS
            )));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                public_base_url: None,
            },
            twilio: TwilioConfig::default(),
            session: SessionConfig {
                secret: String::new(),
                issuer: default_issuer(),
                ttl_secs: default_session_ttl(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}
