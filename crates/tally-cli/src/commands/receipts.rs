//! Receipt workflow commands

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::money::format_usd;
use tally_core::receipts::guess_mime_type;
use tally_core::{Config, ReceiptExtractor, TransactionDraft, VisionBackend, VisionClient};
use tracing::{info, warn};

use super::{load_snapshot, print_json, save_snapshot, Snapshot};

/// Extraction switches from the command line
#[derive(Debug, Default, Clone)]
pub struct ExtractOptions {
    pub mock: bool,
    pub timeout: Option<u64>,
    pub save: bool,
}

/// Next free `receipt-N` id in the snapshot
pub fn next_receipt_id(snapshot: &Snapshot) -> String {
    let next = snapshot
        .transactions
        .iter()
        .filter_map(|t| t.id.strip_prefix("receipt-"))
        .filter_map(|n| n.parse::<u64>().ok())
        .max()
        .map_or(1, |n| n + 1);
    format!("receipt-{}", next)
}

fn build_extractor(config: &Config, options: &ExtractOptions) -> Result<ReceiptExtractor> {
    let mut extractor = if options.mock {
        ReceiptExtractor::new(VisionClient::mock())?
            .with_fallback_delay(config.receipts.fallback_delay())
    } else {
        ReceiptExtractor::from_config(config).context("Failed to set up vision backend")?
    };

    if let Some(secs) = options.timeout {
        extractor = extractor.with_timeout(Duration::from_secs(secs));
    }
    Ok(extractor)
}

fn print_draft(draft: &TransactionDraft) {
    println!();
    println!("🧾 Receipt");
    println!("   ─────────────────────────────────────────────────────────────");
    let vendor = if draft.vendor.is_empty() {
        "(unknown)"
    } else {
        draft.vendor.as_str()
    };
    println!("   Vendor:      {}", vendor);
    println!("   Amount:      {}", format_usd(draft.amount));
    println!("   Category:    {}", draft.category);
    println!("   Date:        {}", draft.date);
    println!("   Payment:     {}", draft.payment_method);
    println!("   Description: {}", draft.description);
}

pub async fn cmd_extract(
    data: &Path,
    config: &Config,
    file: &Path,
    options: &ExtractOptions,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let image = std::fs::read(file)
        .with_context(|| format!("Failed to read receipt {}", file.display()))?;
    let mime_type = guess_mime_type(file);
    let extractor = build_extractor(config, options)?;

    info!(
        file = %file.display(),
        mime_type,
        model = extractor.client().model(),
        "Extracting receipt"
    );
    let draft = extractor.extract_or_fallback(&image, mime_type, today).await;

    if json {
        print_json(&draft)?;
    } else {
        print_draft(&draft);
    }

    if options.save {
        if draft.amount.is_zero() {
            warn!("Extraction fell back to manual entry, nothing saved");
            return Ok(());
        }

        let mut snapshot = if data.exists() {
            load_snapshot(data)?
        } else {
            Snapshot::default()
        };
        let id = next_receipt_id(&snapshot);
        // Newest first, the order the app keeps
        snapshot.transactions.insert(0, draft.into_transaction(id.clone()));
        save_snapshot(data, &snapshot)?;
        info!(id = %id, snapshot = %data.display(), "Saved transaction");
    }

    Ok(())
}
