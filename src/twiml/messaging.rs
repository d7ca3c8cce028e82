//! Messaging markup: `<Message>` replies

use super::{document, escape};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagingResponse {
    messages: Vec<String>,
}

impl MessagingResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply to the sender
    pub fn message(mut self, body: impl Into<String>) -> Self {
        self.messages.push(body.into());
        self
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn to_xml(&self) -> String {
        let inner: String = self
            .messages
            .iter()
            .map(|body| format!("<Message>{}</Message>", escape(body)))
            .collect();
        document(&inner)
    }
}
