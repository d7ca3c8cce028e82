//! Main entry point for the Telephony Gateway

use std::sync::Arc;
use telephony_gateway::{
    api,
    config::{LoggingConfig, Settings},
    provider::TwilioProvider,
    AppState,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "pretty" {
        registry.with(fmt::layer().pretty()).init();
    } else {
        registry.with(fmt::layer().json()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    init_logging(&settings.logging);
    info!("Starting Telephony Gateway");

    let presence = settings.twilio.presence();
    info!(
        account_sid = presence.account_sid,
        auth_token = presence.auth_token,
        api_key_sid = presence.api_key_sid,
        api_key_secret = presence.api_key_secret,
        twiml_app_sid = presence.twiml_app_sid,
        phone_number = presence.phone_number,
        "Provider configuration"
    );
    if !presence.is_complete() {
        warn!("Provider configuration is incomplete; affected endpoints will fail per request");
    }

    let provider = Arc::new(TwilioProvider::new(&settings.twilio)?);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let app_state = Arc::new(AppState::new(settings, provider));

    // Build the router
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
