//! Grouped spending totals with share and trend

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Transaction;
use crate::money;

use super::window::{Period, Window};

/// Trend growth above this ratio is "up"
pub const TREND_UP_RATIO: f64 = 1.10;
/// Trend below this ratio is "down"
pub const TREND_DOWN_RATIO: f64 = 0.90;

/// Field used as the grouping key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Category,
    Vendor,
    PaymentMethod,
}

impl GroupBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Vendor => "vendor",
            Self::PaymentMethod => "payment_method",
        }
    }

    /// The key a transaction falls under
    pub fn key_of<'a>(&self, transaction: &'a Transaction) -> &'a str {
        match self {
            Self::Category => &transaction.category,
            Self::Vendor => &transaction.vendor,
            Self::PaymentMethod => &transaction.payment_method,
        }
    }
}

impl std::str::FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "category" => Ok(Self::Category),
            "vendor" | "merchant" => Ok(Self::Vendor),
            "payment_method" | "payment-method" | "payment" => Ok(Self::PaymentMethod),
            _ => Err(format!("Unknown grouping: {}", s)),
        }
    }
}

impl std::fmt::Display for GroupBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of change versus the prior period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    /// Compare a current amount with the prior one (None = no prior data)
    pub fn between(current: Decimal, prior: Option<Decimal>) -> Self {
        match prior {
            None => {
                if current > Decimal::ZERO {
                    Trend::Up
                } else {
                    Trend::Stable
                }
            }
            Some(prior) => {
                let current = money::to_f64(current);
                let prior = money::to_f64(prior);
                if current > prior * TREND_UP_RATIO {
                    Trend::Up
                } else if current < prior * TREND_DOWN_RATIO {
                    Trend::Down
                } else {
                    Trend::Stable
                }
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

/// Spending total for one group key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingPattern {
    /// Category, vendor or payment method depending on the grouping
    pub key: String,
    pub amount: Decimal,
    /// Number of transactions in the group
    pub count: usize,
    /// Share of the collection total, 0-100
    pub percentage: f64,
    pub trend: Trend,
}

/// Per-key totals in first-encountered order
pub(crate) fn group_totals<'a, I>(
    transactions: I,
    group_by: GroupBy,
) -> Vec<(String, Decimal, usize)>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(String, Decimal, usize)> = Vec::new();

    for tx in transactions {
        let key = group_by.key_of(tx);
        match index.get(key) {
            Some(&i) => {
                groups[i].1 = groups[i].1.saturating_add(tx.amount);
                groups[i].2 += 1;
            }
            None => {
                index.insert(key, groups.len());
                groups.push((key.to_string(), tx.amount, 1));
            }
        }
    }

    groups
}

/// Group, sum and rank a transaction collection
///
/// `prior` is the same-length period immediately before; keys missing there
/// trend up when they have spend. Output is sorted by amount descending and
/// ties keep first-encountered input order.
pub fn aggregate(
    transactions: &[Transaction],
    group_by: GroupBy,
    prior: Option<&[Transaction]>,
) -> Vec<SpendingPattern> {
    aggregate_refs(transactions.iter(), group_by, prior.map(|p| p.iter()))
}

/// [`aggregate`] over borrowed transactions (e.g. a [`Window::filter`] result)
pub fn aggregate_refs<'a, I, P>(
    transactions: I,
    group_by: GroupBy,
    prior: Option<P>,
) -> Vec<SpendingPattern>
where
    I: IntoIterator<Item = &'a Transaction>,
    P: IntoIterator<Item = &'a Transaction>,
{
    let groups = group_totals(transactions, group_by);
    let total = money::sum(groups.iter().map(|g| g.1));

    let prior_totals: HashMap<String, Decimal> = prior
        .map(|p| {
            group_totals(p, group_by)
                .into_iter()
                .map(|(k, amount, _)| (k, amount))
                .collect()
        })
        .unwrap_or_default();

    let mut patterns: Vec<SpendingPattern> = groups
        .into_iter()
        .map(|(key, amount, count)| {
            let trend = Trend::between(amount, prior_totals.get(&key).copied());
            SpendingPattern {
                percentage: money::percent_of(amount, total),
                key,
                amount,
                count,
                trend,
            }
        })
        .collect();

    // Stable sort keeps insertion order for equal amounts
    patterns.sort_by(|a, b| b.amount.cmp(&a.amount));
    patterns
}

/// Category breakdown of the window containing `today`, trended against the
/// previous window of the same type
pub fn spending_patterns(
    transactions: &[Transaction],
    period: Period,
    today: NaiveDate,
) -> Vec<SpendingPattern> {
    let current = Window::current(period, today);
    if period == Period::All {
        return aggregate_refs(
            current.filter(transactions),
            GroupBy::Category,
            None::<Vec<&Transaction>>,
        );
    }
    let previous = current.previous();
    aggregate_refs(
        current.filter(transactions),
        GroupBy::Category,
        Some(previous.filter(transactions)),
    )
}
