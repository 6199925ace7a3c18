//! Receipt extraction through a vision model
//!
//! # Architecture
//!
//! - `VisionBackend` trait: one image + prompt in, raw model text out
//! - `VisionClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - `ReceiptExtractor`: prompt, timeout, parsing and the manual-entry fallback
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::load(None)?;
//! let extractor = ReceiptExtractor::from_config(&config)?;
//! let draft = extractor
//!     .extract_or_fallback(&image_bytes, "image/jpeg", today)
//!     .await;
//! ```
//!
//! Each extraction makes at most one model call. Failures are never retried.

mod mock;
mod openai_compatible;
pub mod parsing;
pub mod prompt;

pub use mock::{MockBackend, MOCK_RECEIPT};
pub use openai_compatible::OpenAICompatibleBackend;
pub use parsing::{parse_receipt_response, strip_code_fences, ReceiptAnalysis};
pub use prompt::{ExtractionPrompt, PROMPT_VERSION};

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::{AiConfig, Config};
use crate::error::{Error, Result};
use crate::models::{PaymentMethod, TransactionDraft, OTHER_CATEGORY};

/// Description placed on the fallback draft
pub const FALLBACK_DESCRIPTION: &str = "Please fill in the details manually";

/// One vision call
#[derive(Debug, Clone, Copy)]
pub struct VisionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub image: &'a [u8],
    pub mime_type: &'a str,
}

/// Interface for vision model backends
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Send the prompt and image, return the model's raw text reply
    async fn complete(&self, request: &VisionRequest<'_>) -> Result<String>;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete vision client enum
#[derive(Clone)]
pub enum VisionClient {
    /// OpenAI-compatible chat completions server
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl VisionClient {
    /// Build the configured backend
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        match config.backend.to_lowercase().as_str() {
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => Ok(
                VisionClient::OpenAICompatible(OpenAICompatibleBackend::from_config(config)),
            ),
            "mock" => Ok(VisionClient::Mock(MockBackend::new())),
            other => Err(Error::Config(format!("Unknown AI backend: {}", other))),
        }
    }

    /// Create a client from `TALLY_AI_*` environment variables
    ///
    /// Returns None unless `TALLY_AI_HOST` is set or the backend is `mock`.
    pub fn from_env() -> Option<Self> {
        let mut config = Config::default();
        config.apply_env();

        let is_mock = config.ai.backend.eq_ignore_ascii_case("mock");
        if !is_mock && std::env::var("TALLY_AI_HOST").is_err() {
            return None;
        }

        match Self::from_config(&config.ai) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "Invalid TALLY_AI_BACKEND");
                None
            }
        }
    }

    /// Create a mock client
    pub fn mock() -> Self {
        VisionClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl VisionBackend for VisionClient {
    async fn complete(&self, request: &VisionRequest<'_>) -> Result<String> {
        match self {
            VisionClient::OpenAICompatible(b) => b.complete(request).await,
            VisionClient::Mock(b) => b.complete(request).await,
        }
    }

    fn model(&self) -> &str {
        match self {
            VisionClient::OpenAICompatible(b) => b.model(),
            VisionClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            VisionClient::OpenAICompatible(b) => b.host(),
            VisionClient::Mock(b) => b.host(),
        }
    }
}

/// Receipt image to transaction draft
#[derive(Clone)]
pub struct ReceiptExtractor {
    client: VisionClient,
    prompt: ExtractionPrompt,
    timeout: Duration,
    fallback_delay: Duration,
}

impl ReceiptExtractor {
    /// Extractor with the embedded prompt and default timings
    pub fn new(client: VisionClient) -> Result<Self> {
        let defaults = Config::default();
        Ok(Self {
            client,
            prompt: ExtractionPrompt::embedded()?,
            timeout: defaults.ai.timeout(),
            fallback_delay: defaults.receipts.fallback_delay(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = VisionClient::from_config(&config.ai)?;
        Ok(Self::new(client)?
            .with_timeout(config.ai.timeout())
            .with_fallback_delay(config.receipts.fallback_delay()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }

    pub fn client(&self) -> &VisionClient {
        &self.client
    }

    /// Send the image to the model once and validate its reply
    pub async fn extract(&self, image: &[u8], mime_type: &str) -> Result<ReceiptAnalysis> {
        if image.is_empty() {
            return Err(Error::InvalidData("Receipt image is empty".into()));
        }

        let request = VisionRequest {
            system: &self.prompt.system,
            prompt: &self.prompt.user,
            image,
            mime_type,
        };

        tracing::debug!(
            model = self.client.model(),
            host = self.client.host(),
            bytes = image.len(),
            prompt_version = self.prompt.metadata.version,
            "Extracting receipt"
        );

        let raw = tokio::time::timeout(self.timeout, self.client.complete(&request))
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;

        let analysis = parse_receipt_response(&raw)?;
        tracing::info!(
            vendor = %analysis.vendor,
            amount = %analysis.amount,
            category = %analysis.category,
            "Receipt extracted"
        );
        Ok(analysis)
    }

    /// [`Self::extract`] with defaults applied for a draft dated `today`
    pub async fn extract_draft(
        &self,
        image: &[u8],
        mime_type: &str,
        today: NaiveDate,
    ) -> Result<TransactionDraft> {
        Ok(self.extract(image, mime_type).await?.into_draft(today))
    }

    /// Blank draft for manual entry, returned after the configured delay
    pub async fn fallback(&self, today: NaiveDate) -> TransactionDraft {
        if !self.fallback_delay.is_zero() {
            tokio::time::sleep(self.fallback_delay).await;
        }

        TransactionDraft {
            date: today,
            vendor: String::new(),
            amount: Decimal::ZERO,
            category: OTHER_CATEGORY.to_string(),
            description: FALLBACK_DESCRIPTION.to_string(),
            payment_method: PaymentMethod::default().as_str().to_string(),
            receipt_url: None,
            is_manually_adjusted: false,
        }
    }

    /// Extract, or hand back the manual-entry draft on any failure
    pub async fn extract_or_fallback(
        &self,
        image: &[u8],
        mime_type: &str,
        today: NaiveDate,
    ) -> TransactionDraft {
        match self.extract_draft(image, mime_type, today).await {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!(error = %e, transport = e.is_transport(), "Receipt extraction failed, using manual entry");
                self.fallback(today).await
            }
        }
    }
}

/// MIME type for a receipt image path, by extension
pub fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        _ => "image/jpeg",
    }
}
