//! In-memory provider that records requests instead of calling out
//!
//! Used by the test suites to drive handlers and services without credentials.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::error::{AppError, Result};
use crate::provider::traits::{
    AccessTokenRequest, CallRecord, CallStatus, MessageRecord, OutboundCall, OutboundMessage,
    TelephonyProvider,
};

#[derive(Default)]
pub struct MockProvider {
    failure: Option<String>,
    sequence: AtomicU64,
    tokens: Mutex<Vec<AccessTokenRequest>>,
    calls: Mutex<Vec<OutboundCall>>,
    updates: Mutex<Vec<(String, CallStatus)>>,
    messages: Mutex<Vec<OutboundMessage>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails with a provider error carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn token_requests(&self) -> Vec<AccessTokenRequest> {
        lock(&self.tokens).clone()
    }

    pub fn created_calls(&self) -> Vec<OutboundCall> {
        lock(&self.calls).clone()
    }

    pub fn call_updates(&self) -> Vec<(String, CallStatus)> {
        lock(&self.updates).clone()
    }

    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        lock(&self.messages).clone()
    }

    fn check_failure(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(AppError::Provider(message.clone())),
            None => Ok(()),
        }
    }

    fn next_sid(&self, prefix: &str) -> String {
        let n = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}{:032x}", prefix, n)
    }
}

#[async_trait]
impl TelephonyProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn create_token(&self, request: &AccessTokenRequest) -> Result<String> {
        self.check_failure()?;
        lock(&self.tokens).push(request.clone());
        Ok(format!("mock-token.{}.{}", request.identity, request.ttl_secs))
    }

    async fn create_call(&self, call: OutboundCall) -> Result<CallRecord> {
        self.check_failure()?;
        lock(&self.calls).push(call);
        Ok(CallRecord {
            sid: self.next_sid("CA"),
            status: CallStatus::Queued,
        })
    }

    async fn update_call(&self, call_sid: &str, status: CallStatus) -> Result<CallRecord> {
        self.check_failure()?;
        lock(&self.updates).push((call_sid.to_string(), status));
        Ok(CallRecord {
            sid: call_sid.to_string(),
            status,
        })
    }

    async fn send_message(&self, message: OutboundMessage) -> Result<MessageRecord> {
        self.check_failure()?;
        lock(&self.messages).push(message);
        Ok(MessageRecord {
            sid: self.next_sid("SM"),
            status: Some("queued".to_string()),
        })
    }
}
