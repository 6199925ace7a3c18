//! Mock backend for testing
//!
//! Returns a canned reply (or a canned failure) without any network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::{VisionBackend, VisionRequest};

/// Reply used by [`MockBackend::new`]
pub const MOCK_RECEIPT: &str = r#"{"vendor":"Whole Foods Market","amount":87.45,"category":"Groceries","description":"Weekly groceries","date":"2024-01-14","paymentMethod":"Credit Card"}"#;

#[derive(Clone, Debug)]
enum MockReply {
    Content(String),
    NetworkFailure(String),
}

/// Mock vision backend
#[derive(Clone, Debug)]
pub struct MockBackend {
    reply: MockReply,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Mock that reads every image as the same grocery receipt
    pub fn new() -> Self {
        Self::replying(MOCK_RECEIPT)
    }

    /// Mock returning `content` verbatim as the model reply
    pub fn replying(content: &str) -> Self {
        Self {
            reply: MockReply::Content(content.to_string()),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock failing every call with a network error
    pub fn failing(message: &str) -> Self {
        Self {
            reply: MockReply::NetworkFailure(message.to_string()),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sleep before answering (for timeout tests)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of calls made, shared across clones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionBackend for MockBackend {
    async fn complete(&self, _request: &VisionRequest<'_>) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.reply {
            MockReply::Content(content) => Ok(content.clone()),
            MockReply::NetworkFailure(message) => Err(Error::Network(message.clone())),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://"
    }
}
