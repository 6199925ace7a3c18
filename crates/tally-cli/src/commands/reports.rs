//! Report command implementations

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tally_core::analytics::aggregate_refs;
use tally_core::ledger::NEAR_LIMIT_PERCENT;
use tally_core::money::format_usd;
use tally_core::{
    budget_health, recompute_spent, summarize, Budget, BudgetHealth, GroupBy, Period,
    SpendingPattern, Transaction, Window,
};

use super::{load_snapshot, print_json, truncate};

const RULE: &str = "   ─────────────────────────────────────────────────────────────";

pub fn cmd_summary(data: &Path, period: Period, today: NaiveDate, json: bool) -> Result<()> {
    let snapshot = load_snapshot(data)?;
    let summary = summarize(&snapshot.transactions, period, today);

    if json {
        return print_json(&summary);
    }

    println!();
    println!("📊 Spending Summary");
    if period == Period::All {
        println!("   Period: all time");
    } else {
        println!(
            "   Period: {} to {}",
            summary.window.start, summary.window.end
        );
    }
    println!("{}", RULE);

    if summary.transaction_count == 0 {
        println!("   No spending found in this period.");
        return Ok(());
    }

    println!("   Total:        {}", format_usd(summary.total_spent));
    println!("   Transactions: {}", summary.transaction_count);
    println!("   Average:      {}", format_usd(summary.average_transaction));
    if let Some(change) = summary.change_percent {
        println!("   Change:       {:+.1}% vs previous {}", change, period);
    }
    if let Some(top) = &summary.top_category {
        println!("   Top category: {} ({:.1}%)", top.key, top.percentage);
    }

    println!();
    println!("   Top vendors:");
    for vendor in &summary.top_vendors {
        println!(
            "     {:25} {:>10}  ({} purchases)",
            truncate(&vendor.key, 25),
            format_usd(vendor.amount),
            vendor.count
        );
    }

    println!();
    println!("   Payment methods:");
    for method in &summary.payment_methods {
        println!("     {:25} {:>5.1}%", method.key, method.percentage);
    }

    Ok(())
}

/// Grouped totals for the window of `period` containing `today`, trended
/// against the window before it
pub fn period_patterns(
    transactions: &[Transaction],
    period: Period,
    group_by: GroupBy,
    today: NaiveDate,
) -> Vec<SpendingPattern> {
    let window = Window::current(period, today);
    let current = window.filter(transactions);
    let prior = (period != Period::All).then(|| window.previous().filter(transactions));
    aggregate_refs(current, group_by, prior)
}

pub fn cmd_patterns(
    data: &Path,
    period: Period,
    group_by: GroupBy,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let snapshot = load_snapshot(data)?;
    let patterns = period_patterns(&snapshot.transactions, period, group_by, today);

    if json {
        return print_json(&patterns);
    }

    println!();
    println!("📈 Spending by {} ({})", group_by, period);
    println!("{}", RULE);

    if patterns.is_empty() {
        println!("   No spending found in this period.");
        return Ok(());
    }

    println!(
        "   {:25} │ {:>10} │ {:>6} │ {:>5} │ Trend",
        "Key", "Amount", "%", "Count"
    );
    println!("   ──────────────────────────┼────────────┼────────┼───────┼───────");
    for pattern in &patterns {
        println!(
            "   {:25} │ {:>10} │ {:>5.1}% │ {:>5} │ {}",
            truncate(&pattern.key, 25),
            format_usd(pattern.amount),
            pattern.percentage,
            pattern.count,
            pattern.trend.as_str()
        );
    }

    Ok(())
}

#[derive(Serialize)]
struct BudgetReport<'a> {
    budgets: &'a [Budget],
    health: &'a BudgetHealth,
}

fn budget_status(budget: &Budget) -> &'static str {
    if budget.is_over() {
        "over"
    } else if budget
        .usage_percent()
        .is_some_and(|p| p >= NEAR_LIMIT_PERCENT)
    {
        "near limit"
    } else {
        "ok"
    }
}

pub fn cmd_budgets(data: &Path, recompute: bool, today: NaiveDate, json: bool) -> Result<()> {
    let snapshot = load_snapshot(data)?;
    let budgets = if recompute {
        recompute_spent(&snapshot.budgets, &snapshot.transactions, today)
    } else {
        snapshot.budgets
    };
    let health = budget_health(&budgets);

    if json {
        return print_json(&BudgetReport {
            budgets: &budgets,
            health: &health,
        });
    }

    println!();
    println!("💰 Budgets");
    println!("{}", RULE);

    if budgets.is_empty() {
        println!("   No budgets set.");
        return Ok(());
    }

    for budget in &budgets {
        let usage = budget
            .usage_percent()
            .map(|p| format!("{:.1}%", p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {:20} {:>10} / {:>10}  {:>7}  {}",
            truncate(&budget.category, 20),
            format_usd(budget.spent),
            format_usd(budget.limit),
            usage,
            budget_status(budget)
        );
    }

    println!("{}", RULE);
    if health.remaining < Decimal::ZERO {
        println!("   Over by {}", format_usd(-health.remaining));
    } else {
        println!("   Remaining: {}", format_usd(health.remaining));
    }
    println!(
        "   {} over, {} near limit, {} total",
        health.over_count, health.near_limit_count, health.budget_count
    );

    Ok(())
}
