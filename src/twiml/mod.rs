//! Call-control and messaging markup (TwiML) rendering

pub mod messaging;
pub mod voice;

pub use messaging::MessagingResponse;
pub use voice::{Dial, Say, VoiceResponse, VoiceVerb};

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

pub const TWIML_CONTENT_TYPE: &str = "text/xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A rendered markup document, served as `text/xml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Twiml(pub String);

impl IntoResponse for Twiml {
    fn into_response(self) -> Response {
        ([(CONTENT_TYPE, TWIML_CONTENT_TYPE)], self.0).into_response()
    }
}

impl From<VoiceResponse> for Twiml {
    fn from(response: VoiceResponse) -> Self {
        Twiml(response.to_xml())
    }
}

impl From<MessagingResponse> for Twiml {
    fn from(response: MessagingResponse) -> Self {
        Twiml(response.to_xml())
    }
}

/// Wrap rendered verbs in the `<Response>` root
fn document(inner: &str) -> String {
    format!("{}<Response>{}</Response>", XML_DECLARATION, inner)
}

/// Whether XML 1.0 can carry `c` at all, escaped or not
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Escape character data and attribute values. Characters XML cannot
/// represent are dropped.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars().filter(|c| is_xml_char(*c)) {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
