//! Budget, large-purchase and summary notifications from a snapshot

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::{aggregate, GroupBy};
use crate::models::{Budget, Transaction};
use crate::money;

use super::types::{Notification, NotificationType, Priority};

/// Maximum notifications returned by one derivation
pub const MAX_NOTIFICATIONS: usize = 10;
/// Usage percentage at which a budget warning starts
pub const BUDGET_WARNING_PERCENT: f64 = 80.0;
/// Floor for the large-transaction threshold
pub const LARGE_TRANSACTION_FLOOR: Decimal = Decimal::ONE_HUNDRED;
/// Large transactions reported per derivation
pub const LARGE_TRANSACTION_LIMIT: usize = 3;
/// Upper bound on the insight count announced
pub const ANNOUNCED_INSIGHTS_LIMIT: usize = 5;

/// Which notification families are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    pub budget_alerts: bool,
    pub weekly_reports: bool,
    pub large_transactions: bool,
    pub insight_alerts: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            budget_alerts: true,
            weekly_reports: true,
            large_transactions: true,
            insight_alerts: true,
        }
    }
}

/// Derive notifications with every family enabled
pub fn derive_notifications(
    transactions: &[Transaction],
    budgets: &[Budget],
    now: DateTime<Utc>,
) -> Vec<Notification> {
    derive_with_preferences(
        transactions,
        budgets,
        now,
        &NotificationPreferences::default(),
    )
}

/// Derive, sort (priority, then newest) and cap notifications
pub fn derive_with_preferences(
    transactions: &[Transaction],
    budgets: &[Budget],
    now: DateTime<Utc>,
    preferences: &NotificationPreferences,
) -> Vec<Notification> {
    let mut notifications = Vec::new();

    if preferences.budget_alerts {
        notifications.extend(budget_notifications(budgets, now));
    }
    if preferences.large_transactions {
        notifications.extend(large_transaction_notifications(transactions));
    }
    if preferences.weekly_reports {
        notifications.extend(weekly_report(transactions, now));
    }
    if preferences.insight_alerts {
        notifications.extend(insight_announcement(transactions, now));
    }

    // Stable: equal keys keep derivation order
    notifications.sort_by(|a, b| {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
    notifications.truncate(MAX_NOTIFICATIONS);

    tracing::debug!(count = notifications.len(), "Derived notifications");
    notifications
}

fn budget_notifications(budgets: &[Budget], now: DateTime<Utc>) -> Vec<Notification> {
    let mut out = Vec::new();

    for budget in budgets {
        // Non-positive limits have no meaningful usage
        let Some(usage) = budget.usage_percent() else {
            tracing::debug!(budget = %budget.id, "Skipping budget without a positive limit");
            continue;
        };

        if budget.is_over() {
            out.push(Notification::new(
                format!("budget-over-{}", budget.id),
                NotificationType::Budget,
                Priority::High,
                "Budget Exceeded",
                format!(
                    "Your {} budget is over by {}",
                    budget.category,
                    money::format_usd(budget.spent.saturating_sub(budget.limit))
                ),
                now,
            ));
        } else if usage >= BUDGET_WARNING_PERCENT {
            out.push(Notification::new(
                format!("budget-warning-{}", budget.id),
                NotificationType::Budget,
                Priority::Medium,
                "Budget Warning",
                format!(
                    "You've used {:.1}% of your {} budget",
                    usage, budget.category
                ),
                now,
            ));
        }
    }

    out
}

fn large_transaction_notifications(transactions: &[Transaction]) -> Vec<Notification> {
    if transactions.is_empty() {
        return vec![];
    }

    let total = money::sum(transactions.iter().map(|t| t.amount));
    let doubled_mean = money::mean(total, transactions.len()).saturating_mul(Decimal::TWO);
    let threshold = doubled_mean.max(LARGE_TRANSACTION_FLOOR);

    let mut large: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.amount > threshold)
        .collect();
    large.sort_by(|a, b| b.amount.cmp(&a.amount));

    large
        .into_iter()
        .take(LARGE_TRANSACTION_LIMIT)
        .map(|t| {
            Notification::new(
                format!("large-transaction-{}", t.id),
                NotificationType::LargeTransaction,
                Priority::Medium,
                "Large Transaction Detected",
                format!("{} spent at {}", money::format_usd(t.amount), t.vendor),
                t.date.and_time(chrono::NaiveTime::MIN).and_utc(),
            )
        })
        .collect()
}

fn weekly_report(transactions: &[Transaction], now: DateTime<Utc>) -> Option<Notification> {
    if transactions.is_empty() {
        return None;
    }

    let total = money::sum(transactions.iter().map(|t| t.amount));
    let top = aggregate(transactions, GroupBy::Category, None)
        .into_iter()
        .next()
        .map(|p| p.key)?;

    Some(Notification::new(
        "weekly-report",
        NotificationType::WeeklyReport,
        Priority::Low,
        "Spending Summary",
        format!(
            "You've spent {} total, mostly on {}",
            money::format_usd(total),
            top
        ),
        now,
    ))
}

fn insight_announcement(transactions: &[Transaction], now: DateTime<Utc>) -> Option<Notification> {
    if transactions.len() < 2 {
        return None;
    }

    let count = transactions.len().min(ANNOUNCED_INSIGHTS_LIMIT);
    Some(Notification::new(
        "ai-insights",
        NotificationType::Insight,
        Priority::Low,
        "New AI Insights Available",
        format!(
            "We've analyzed your spending patterns and found {} insights",
            count
        ),
        now,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{budget, tx};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_extreme_amounts_do_not_panic() {
        let txns = vec![
            tx("1", "2024-02-10", "Apple Store", Decimal::MAX, "Shopping"),
            tx("2", "2024-02-11", "Apple Store", Decimal::MAX, "Shopping"),
        ];
        let budgets = vec![budget("b1", "Shopping", dec!(100), Decimal::MAX)];

        let out = derive_notifications(&txns, &budgets, now());
        assert_eq!(out[0].id, "budget-over-b1");
        assert!(out.iter().any(|n| n.id == "weekly-report"));
        assert!(crate::insights::generate_insights(&txns, now().date_naive()).len() <= 8);
    }

    #[test]
    fn test_budget_warning() {
        let budgets = vec![budget("b1", "Groceries", dec!(300), dec!(245.67))];
        let out = derive_notifications(&[], &budgets, now());

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "budget-warning-b1");
        assert_eq!(out[0].priority, Priority::Medium);
        assert!(out[0].message.contains("81.9%"));
    }

    #[test]
    fn test_budget_exceeded() {
        let budgets = vec![budget("b2", "Entertainment", dec!(300), dec!(320))];
        let out = derive_notifications(&[], &budgets, now());

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Budget Exceeded");
        assert_eq!(out[0].priority, Priority::High);
        assert!(out[0].message.contains("$20.00"));
    }

    #[test]
    fn test_budget_at_exact_limit_warns() {
        let budgets = vec![budget("b1", "Groceries", dec!(300), dec!(300))];
        let out = derive_notifications(&[], &budgets, now());
        assert_eq!(out[0].id, "budget-warning-b1");
        assert!(out[0].message.contains("100.0%"));
    }

    #[test]
    fn test_budget_under_warning_threshold_and_zero_limit() {
        let budgets = vec![
            budget("b1", "Groceries", dec!(300), dec!(100)),
            budget("b2", "Shopping", dec!(0), dec!(50)),
        ];
        assert!(derive_notifications(&[], &budgets, now()).is_empty());
    }

    #[test]
    fn test_large_transactions_top_three() {
        let txns = vec![
            tx("1", "2024-02-01", "A", dec!(650), "Shopping"),
            tx("2", "2024-02-02", "B", dec!(700), "Shopping"),
            tx("3", "2024-02-03", "C", dec!(600), "Shopping"),
            tx("4", "2024-02-04", "D", dec!(800), "Shopping"),
            tx("5", "2024-02-05", "E", dec!(5), "Food & Drink"),
            tx("6", "2024-02-06", "F", dec!(5), "Food & Drink"),
            tx("7", "2024-02-07", "G", dec!(5), "Food & Drink"),
            tx("8", "2024-02-08", "H", dec!(5), "Food & Drink"),
            tx("9", "2024-02-09", "I", dec!(5), "Food & Drink"),
            tx("10", "2024-02-10", "J", dec!(5), "Food & Drink"),
        ];
        let prefs = NotificationPreferences {
            weekly_reports: false,
            insight_alerts: false,
            ..NotificationPreferences::default()
        };
        let out = derive_with_preferences(&txns, &[], now(), &prefs);

        // Threshold is 2x the 278 mean; 600 is the fourth largest and dropped.
        // Equal priority sorts newest first.
        let ids: Vec<&str> = out.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "large-transaction-4",
                "large-transaction-2",
                "large-transaction-1",
            ]
        );
        assert_eq!(
            out[0].timestamp,
            Utc.with_ymd_and_hms(2024, 2, 4, 0, 0, 0).unwrap()
        );
        assert_eq!(out[0].message, "$800.00 spent at D");
    }

    #[test]
    fn test_large_transaction_floor() {
        // Mean is 40 so 2x mean is 80, but the floor is 100
        let txns = vec![
            tx("1", "2024-02-01", "A", dec!(90), "Shopping"),
            tx("2", "2024-02-02", "B", dec!(10), "Shopping"),
            tx("3", "2024-02-03", "C", dec!(20), "Shopping"),
        ];
        let out = derive_notifications(&txns, &[], now());
        assert!(out
            .iter()
            .all(|n| n.notification_type != NotificationType::LargeTransaction));
    }

    #[test]
    fn test_summary_and_insight_announcement() {
        let txns = vec![
            tx("1", "2024-02-01", "Kroger", dec!(60), "Groceries"),
            tx("2", "2024-02-02", "Uber", dec!(20), "Transportation"),
        ];
        let out = derive_notifications(&txns, &[], now());
        assert_eq!(out.len(), 2);

        let report = out.iter().find(|n| n.id == "weekly-report").unwrap();
        assert_eq!(report.message, "You've spent $80.00 total, mostly on Groceries");

        let insights = out.iter().find(|n| n.id == "ai-insights").unwrap();
        assert!(insights.message.contains("found 2 insights"));
    }

    #[test]
    fn test_single_transaction_has_no_insight_announcement() {
        let txns = vec![tx("1", "2024-02-01", "Kroger", dec!(60), "Groceries")];
        let out = derive_notifications(&txns, &[], now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].notification_type, NotificationType::WeeklyReport);
    }

    #[test]
    fn test_announced_insights_capped() {
        let txns: Vec<Transaction> = (0..9)
            .map(|i| tx(&i.to_string(), "2024-02-01", "Kroger", dec!(10), "Groceries"))
            .collect();
        let out = derive_notifications(&txns, &[], now());
        let insights = out.iter().find(|n| n.id == "ai-insights").unwrap();
        assert!(insights.message.contains("found 5 insights"));
    }

    #[test]
    fn test_ordering_and_cap() {
        let budgets: Vec<Budget> = (0..12)
            .map(|i| budget(&format!("b{}", i), "Shopping", dec!(100), dec!(90)))
            .chain(std::iter::once(budget("over", "Groceries", dec!(100), dec!(150))))
            .collect();
        let txns = vec![
            tx("1", "2024-02-01", "Kroger", dec!(60), "Groceries"),
            tx("2", "2024-02-02", "Uber", dec!(20), "Transportation"),
        ];

        let out = derive_notifications(&txns, &budgets, now());
        assert_eq!(out.len(), MAX_NOTIFICATIONS);
        assert_eq!(out[0].id, "budget-over-over");
        assert!(out
            .windows(2)
            .all(|w| w[0].priority.rank() >= w[1].priority.rank()));
        // Low priority summaries are pushed out by the cap
        assert!(out.iter().all(|n| n.priority != Priority::Low));
    }

    #[test]
    fn test_preferences_disable_families() {
        let budgets = vec![budget("b2", "Entertainment", dec!(300), dec!(320))];
        let txns = vec![
            tx("1", "2024-02-01", "Kroger", dec!(60), "Groceries"),
            tx("2", "2024-02-02", "Uber", dec!(20), "Transportation"),
        ];
        let prefs = NotificationPreferences {
            budget_alerts: false,
            weekly_reports: false,
            large_transactions: false,
            insight_alerts: false,
        };
        assert!(derive_with_preferences(&txns, &budgets, now(), &prefs).is_empty());
    }

    #[test]
    fn test_empty_snapshot() {
        assert!(derive_notifications(&[], &[], now()).is_empty());
    }
}
