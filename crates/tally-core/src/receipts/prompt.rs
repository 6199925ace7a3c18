//! Versioned receipt extraction prompt
//!
//! The prompt file carries YAML frontmatter (`id`, `version`, `task_type`)
//! followed by `# System` and `# User` sections. The version is checked
//! against [`PROMPT_VERSION`] so the prompt and the response schema in
//! [`super::parsing`] cannot drift apart silently.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{PaymentMethod, CATEGORIES};

/// Version of the prompt the response parser is written against
pub const PROMPT_VERSION: u32 = 1;

/// Embedded default prompt (compiled into binary)
const EXTRACT_RECEIPT: &str = include_str!("../../../../prompts/extract_receipt.md");

/// Prompt frontmatter metadata
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    pub version: u32,
    pub task_type: String,
}

/// The extraction prompt, split into its chat roles
#[derive(Debug, Clone)]
pub struct ExtractionPrompt {
    pub metadata: PromptMetadata,
    pub system: String,
    pub user: String,
}

impl ExtractionPrompt {
    /// The compiled-in prompt with taxonomy placeholders filled
    pub fn embedded() -> Result<Self> {
        Self::parse(EXTRACT_RECEIPT)
    }

    /// Parse a prompt file; rejects versions the parser doesn't understand
    pub fn parse(content: &str) -> Result<Self> {
        let (metadata, body) = split_frontmatter(content)?;

        if metadata.version != PROMPT_VERSION {
            return Err(Error::Config(format!(
                "Prompt {} is version {}, expected {}",
                metadata.id, metadata.version, PROMPT_VERSION
            )));
        }

        let system = extract_section(body, "# System").unwrap_or_default();
        let user = extract_section(body, "# User").ok_or_else(|| {
            Error::Config(format!("Prompt {} has no # User section", metadata.id))
        })?;

        Ok(Self {
            metadata,
            system: render(system),
            user: render(user),
        })
    }
}

fn split_frontmatter(content: &str) -> Result<(PromptMetadata, &str)> {
    let content = content.trim();
    let rest = content.strip_prefix("---").ok_or_else(|| {
        Error::Config("Prompt must start with YAML frontmatter (---)".into())
    })?;
    let end = rest.find("---").ok_or_else(|| {
        Error::Config("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let metadata: PromptMetadata = serde_yaml::from_str(rest[..end].trim())
        .map_err(|e| Error::Config(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, rest[end + 3..].trim()))
}

/// Text under `header` up to the next top-level header
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after = &content[start + header.len()..];
    let end = after.find("\n# ").unwrap_or(after.len());
    Some(after[..end].trim())
}

fn render(template: &str) -> String {
    let payment_methods: Vec<&str> = PaymentMethod::all().iter().map(|m| m.as_str()).collect();
    template
        .replace("{{categories}}", &CATEGORIES.join(", "))
        .replace("{{payment_methods}}", &payment_methods.join(", "))
}
