//! Component logic behind the HTTP surface
//!
//! Every service validates its inputs and delegates to the injected
//! [`TelephonyProvider`](crate::provider::TelephonyProvider). None of them keep
//! state between requests.

pub mod calls;
pub mod messaging;
pub mod otp;
pub mod session;
pub mod token;

pub use calls::{render_call_markup, CallController, CallStatusEvent, CallbackUrls};
pub use messaging::{render_auto_reply, InboundMessage, MessagingGateway};
pub use otp::{OtpService, SentOtp, VerifiedOtp};
pub use session::{SessionClaims, SessionTokens};
pub use token::{IssuedToken, TokenIssuer};

/// Treat missing and empty values alike
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
