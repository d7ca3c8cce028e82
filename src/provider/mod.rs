//! Provider module - Trait, Twilio REST client, access tokens, and a recording mock

pub mod access_token;
pub mod mock;
pub mod traits;
pub mod twilio;

pub use access_token::{AccessToken, VoiceGrant};
pub use mock::MockProvider;
pub use traits::{
    is_resource_sid, AccessTokenRequest, CallRecord, CallStatus, MessageRecord, OutboundCall,
    OutboundMessage, TelephonyProvider,
};
pub use twilio::TwilioProvider;
