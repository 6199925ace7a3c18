//! Insight command implementation

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use tally_core::{Config, Impact, InsightEngine};

use super::{load_snapshot, print_json};

fn impact_marker(impact: Impact) -> &'static str {
    match impact {
        Impact::High => "🔴",
        Impact::Medium => "🟡",
        Impact::Low => "🟢",
    }
}

pub fn cmd_insights(data: &Path, config: &Config, today: NaiveDate, json: bool) -> Result<()> {
    let snapshot = load_snapshot(data)?;
    let engine = InsightEngine::new(config.insights.clone());
    let insights = engine.generate(&snapshot.transactions, today);

    if json {
        return print_json(&insights);
    }

    println!();
    println!("💡 Insights");
    println!("   ─────────────────────────────────────────────────────────────");

    if insights.is_empty() {
        println!("   Not enough spending yet to find patterns.");
        return Ok(());
    }

    for insight in &insights {
        let category = insight
            .category
            .as_deref()
            .map(|c| format!(" [{}]", c))
            .unwrap_or_default();
        println!(
            "   {} {} ({}){}",
            impact_marker(insight.impact),
            insight.title,
            insight.insight_type,
            category
        );
        println!("      {}", insight.description);
    }

    Ok(())
}
