//! Configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An override file (explicit path, or ~/.config/tally/config.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Environment variables are applied on top by [`Config::apply_env`]:
//! - `TALLY_AI_BACKEND`: openai_compatible | mock
//! - `TALLY_AI_HOST`: vision server base URL
//! - `TALLY_AI_MODEL`: vision model name
//! - `TALLY_AI_API_KEY` (or `OPENAI_API_KEY`): bearer token

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::categorize::{CategoryClassifier, CategoryRule};
use crate::error::{Error, Result};
use crate::insights::InsightConfig;
use crate::notifications::NotificationPreferences;

/// Embedded default config (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Vision model connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Backend name: "openai_compatible" or "mock"
    pub backend: String,
    pub host: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: "openai_compatible".to_string(),
            host: "https://api.openai.com".to_string(),
            model: "gpt-4o".to_string(),
            api_key: None,
            timeout_secs: 30,
            max_tokens: 500,
        }
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Receipt extraction behavior outside the model call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptConfig {
    /// Simulated processing delay before the manual-entry fallback
    pub fallback_delay_ms: u64,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            fallback_delay_ms: 2000,
        }
    }
}

impl ReceiptConfig {
    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ai: AiConfig,
    pub receipts: ReceiptConfig,
    pub insights: InsightConfig,
    pub notifications: NotificationPreferences,
    /// Custom keyword table; empty means the built-in one
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryRule>,
}

impl Config {
    /// Load config: explicit path, then the default override location, then
    /// embedded defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_path(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(default_path) => Self::from_path(&default_path)?,
                None => {
                    tracing::debug!("No config override found, using embedded defaults");
                    Self::from_toml(DEFAULT_CONFIG)?
                }
            },
        };
        config.apply_env();
        Ok(config)
    }

    /// Read one config file; missing keys take their defaults
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "Loaded config override");
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))
    }

    /// Apply `TALLY_AI_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(backend) = get("TALLY_AI_BACKEND") {
            self.ai.backend = backend;
        }
        if let Some(host) = get("TALLY_AI_HOST") {
            self.ai.host = host;
        }
        if let Some(model) = get("TALLY_AI_MODEL") {
            self.ai.model = model;
        }
        if let Some(key) = get("TALLY_AI_API_KEY").or_else(|| get("OPENAI_API_KEY")) {
            self.ai.api_key = Some(key);
        }
    }

    /// Classifier for the configured keyword table
    pub fn classifier(&self) -> CategoryClassifier {
        if self.categories.is_empty() {
            CategoryClassifier::new()
        } else {
            CategoryClassifier::with_rules(self.categories.clone())
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tally").join("config.toml"))
}
