//! Shared command utilities and the small standalone commands

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::{Budget, Config, Transaction};
use tracing::debug;

/// Transactions and budgets as exported by the app
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&content)
        .with_context(|| format!("Invalid snapshot {}", path.display()))?;

    debug!(
        transactions = snapshot.transactions.len(),
        budgets = snapshot.budgets.len(),
        "Loaded snapshot"
    );
    Ok(snapshot)
}

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let content = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path).context("Failed to load config")
}

/// `--today` or the local calendar date
pub fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

/// Midnight UTC of `--today`, or the current instant
pub fn resolve_now(today: Option<NaiveDate>) -> DateTime<Utc> {
    match today {
        Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
        None => Utc::now(),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn cmd_classify(config: &Config, vendor: &str, description: &str) -> Result<()> {
    let category = config.classifier().classify(vendor, description);
    println!("{}", category);
    Ok(())
}

pub fn cmd_config(config: &Config) -> Result<()> {
    let mut shown = config.clone();
    if shown.ai.api_key.is_some() {
        shown.ai.api_key = Some("********".to_string());
    }

    let rendered = toml::to_string_pretty(&shown).context("Failed to render config")?;
    print!("{}", rendered);
    Ok(())
}
