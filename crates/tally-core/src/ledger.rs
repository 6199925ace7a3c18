//! Budget ledger: derive `spent` from transactions and summarize budget health

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::{Period, Window};
use crate::models::{Budget, Transaction};
use crate::money;

/// Usage percentage at which a budget counts as near its limit
pub const NEAR_LIMIT_PERCENT: f64 = 80.0;

/// Spend counted against `budget` in its period containing `today`
pub fn spent_for(budget: &Budget, transactions: &[Transaction], today: NaiveDate) -> Decimal {
    let window = Window::current(Period::from(budget.period), today);
    money::sum(
        window
            .filter(transactions)
            .into_iter()
            .filter(|t| budget.covers(t))
            .map(|t| t.amount),
    )
}

/// Copy of `budgets` with `spent` recomputed for each budget's current period
pub fn recompute_spent(
    budgets: &[Budget],
    transactions: &[Transaction],
    today: NaiveDate,
) -> Vec<Budget> {
    budgets
        .iter()
        .map(|b| {
            let spent = spent_for(b, transactions, today);
            if spent != b.spent {
                tracing::debug!(budget = %b.id, old = %b.spent, new = %spent, "Budget spent recomputed");
            }
            Budget {
                spent,
                ..b.clone()
            }
        })
        .collect()
}

/// Aggregate status across budgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetHealth {
    pub total_limit: Decimal,
    pub total_spent: Decimal,
    /// Limit minus spent; negative when overspent
    pub remaining: Decimal,
    pub over_count: usize,
    /// Budgets at or above the warning level but not over
    pub near_limit_count: usize,
    pub budget_count: usize,
}

/// Summarize budgets
///
/// An overall budget already spans every category, so when one exists the
/// totals come from it alone instead of double counting the category budgets.
pub fn budget_health(budgets: &[Budget]) -> BudgetHealth {
    let counted: Vec<&Budget> = match budgets.iter().find(|b| b.is_overall()) {
        Some(overall) => vec![overall],
        None => budgets.iter().collect(),
    };

    let total_limit = money::sum(counted.iter().map(|b| b.limit));
    let total_spent = money::sum(counted.iter().map(|b| b.spent));

    let over_count = budgets.iter().filter(|b| b.is_over()).count();
    let near_limit_count = budgets
        .iter()
        .filter(|b| !b.is_over())
        .filter(|b| b.usage_percent().is_some_and(|p| p >= NEAR_LIMIT_PERCENT))
        .count();

    BudgetHealth {
        total_limit,
        total_spent,
        remaining: total_limit.saturating_sub(total_spent),
        over_count,
        near_limit_count,
        budget_count: budgets.len(),
    }
}
