//! Headline figures for a period: totals, averages, leaders and change

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Transaction;
use crate::money;

use super::aggregate::{aggregate_refs, GroupBy, SpendingPattern};
use super::window::{Period, Window};

/// How many vendors the summary lists
pub const TOP_VENDOR_LIMIT: usize = 5;

/// Headline numbers for one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub window: Window,
    pub total_spent: Decimal,
    pub transaction_count: usize,
    pub average_transaction: Decimal,
    /// Leading category with its share of the window total
    pub top_category: Option<SpendingPattern>,
    pub top_vendors: Vec<SpendingPattern>,
    pub payment_methods: Vec<SpendingPattern>,
    /// Percent change of the total versus the previous window; None without
    /// prior spend or for `Period::All`
    pub change_percent: Option<f64>,
}

/// Summarize the window of `period` containing `today`
pub fn summarize(
    transactions: &[Transaction],
    period: Period,
    today: NaiveDate,
) -> SpendingSummary {
    let window = Window::current(period, today);
    let current = window.filter(transactions);

    let total_spent = money::sum(current.iter().map(|t| t.amount));
    let transaction_count = current.len();

    let categories = aggregate_refs(
        current.iter().copied(),
        GroupBy::Category,
        None::<Vec<&Transaction>>,
    );
    let mut top_vendors = aggregate_refs(
        current.iter().copied(),
        GroupBy::Vendor,
        None::<Vec<&Transaction>>,
    );
    top_vendors.truncate(TOP_VENDOR_LIMIT);
    let payment_methods = aggregate_refs(
        current.iter().copied(),
        GroupBy::PaymentMethod,
        None::<Vec<&Transaction>>,
    );

    let change = if period == Period::All {
        None
    } else {
        let previous_total =
            money::sum(window.previous().filter(transactions).iter().map(|t| t.amount));
        change_percent(total_spent, previous_total)
    };

    SpendingSummary {
        window,
        total_spent,
        transaction_count,
        average_transaction: money::mean(total_spent, transaction_count),
        top_category: categories.into_iter().next(),
        top_vendors,
        payment_methods,
        change_percent: change,
    }
}

/// Percent change from `previous` to `current`; None when previous is zero
pub fn change_percent(current: Decimal, previous: Decimal) -> Option<f64> {
    if previous <= Decimal::ZERO {
        return None;
    }
    Some(money::ratio(current.saturating_sub(previous), previous) * 100.0)
}
