//! Insight Engine - runs the registered rules over a snapshot

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::{aggregate_refs, GroupBy, Period, SpendingPattern, Window};
use crate::models::Transaction;
use crate::money;

use super::category_rules::{CategoryShiftRule, TopCategoryRule};
use super::pattern_rules::{LargeTransactionRule, PaymentConcentrationRule, WeekendRule};
use super::period_change::PeriodChangeRule;
use super::types::Insight;
use super::vendor_rules::{FrequentVendorRule, SubscriptionRule};

/// Thresholds for the built-in rules (percentages are 0-100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Maximum number of insights returned
    pub max_insights: usize,
    /// Top category share that triggers an insight
    pub dominance_share: f64,
    /// Top category share that makes it high impact
    pub dominance_high_share: f64,
    /// Total change vs previous period that triggers an insight
    pub period_change: f64,
    pub period_change_high: f64,
    /// Minimum visits before a vendor counts as frequent
    pub frequent_vendor_min_count: usize,
    /// Multiple of the average transaction that counts as large
    pub large_multiplier: f64,
    /// Share of spend in large transactions that makes it high impact
    pub large_share_high: f64,
    pub weekend_share: f64,
    pub weekend_high_share: f64,
    /// Single payment method share that triggers a recommendation
    pub payment_share: f64,
    /// Per-category change vs previous period that triggers an insight
    pub category_shift: f64,
    pub category_shift_high: f64,
    /// Vendors always treated as subscriptions
    pub subscription_vendors: Vec<String>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            max_insights: 8,
            dominance_share: 25.0,
            dominance_high_share: 40.0,
            period_change: 10.0,
            period_change_high: 25.0,
            frequent_vendor_min_count: 3,
            large_multiplier: 2.0,
            large_share_high: 40.0,
            weekend_share: 35.0,
            weekend_high_share: 50.0,
            payment_share: 75.0,
            category_shift: 30.0,
            category_shift_high: 50.0,
            subscription_vendors: ["Netflix", "Spotify", "Hulu", "Disney+"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Snapshot view shared by all rules, computed once per run
pub struct AnalysisContext<'a> {
    pub config: &'a InsightConfig,
    /// Transactions in the analyzed window
    pub current: Vec<&'a Transaction>,
    /// Transactions in the window before it (empty when unavailable)
    pub previous: Vec<&'a Transaction>,
    pub window: Window,
    pub total: Decimal,
    pub previous_total: Decimal,
    /// Mean transaction amount in the current set
    pub average: Decimal,
    /// Category totals of the current set, trended against the previous one
    pub categories: Vec<SpendingPattern>,
}

impl<'a> AnalysisContext<'a> {
    /// Build the context for the calendar month containing `today`
    ///
    /// When that month holds no transactions the whole input is analyzed
    /// instead, with no previous period.
    pub fn new(transactions: &'a [Transaction], today: NaiveDate, config: &'a InsightConfig) -> Self {
        let month = Window::current(Period::Month, today);
        let in_month = month.filter(transactions);

        let (window, current, previous) = if in_month.is_empty() {
            (
                Window::current(Period::All, today),
                transactions.iter().collect(),
                Vec::new(),
            )
        } else {
            let previous = month.previous().filter(transactions);
            (month, in_month, previous)
        };

        let total = money::sum(current.iter().map(|t| t.amount));
        let previous_total = money::sum(previous.iter().map(|t| t.amount));
        let average = money::mean(total, current.len());
        let categories = aggregate_refs(
            current.iter().copied(),
            GroupBy::Category,
            Some(previous.iter().copied()),
        );

        Self {
            config,
            current,
            previous,
            window,
            total,
            previous_total,
            average,
            categories,
        }
    }

    /// Human label for the analyzed window ("this month" / "overall")
    pub fn period_label(&self) -> &'static str {
        match self.window.period {
            Period::Week => "this week",
            Period::Month => "this month",
            Period::Year => "this year",
            Period::All => "overall",
        }
    }

    /// Current-set totals for another grouping
    pub fn grouped(&self, group_by: GroupBy) -> Vec<SpendingPattern> {
        aggregate_refs(
            self.current.iter().copied(),
            group_by,
            None::<Vec<&Transaction>>,
        )
    }
}

/// A single insight check
pub trait InsightRule: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &'static str;

    /// Inspect the snapshot and return zero or more insights
    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight>;
}

/// Ordered set of rules producing a capped, deduplicated insight list
pub struct InsightEngine {
    config: InsightConfig,
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(InsightConfig::default())
    }
}

impl InsightEngine {
    /// Engine with the built-in rules in their evaluation order
    pub fn new(config: InsightConfig) -> Self {
        let mut engine = Self {
            config,
            rules: vec![],
        };

        engine.register(Box::new(TopCategoryRule));
        engine.register(Box::new(PeriodChangeRule));
        engine.register(Box::new(FrequentVendorRule));
        engine.register(Box::new(LargeTransactionRule));
        engine.register(Box::new(WeekendRule));
        engine.register(Box::new(PaymentConcentrationRule));
        engine.register(Box::new(CategoryShiftRule));
        engine.register(Box::new(SubscriptionRule));

        engine
    }

    /// Append a rule; it runs after the ones already registered
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule in order, dedupe by id (first wins), cap the result
    pub fn generate(&self, transactions: &[Transaction], today: NaiveDate) -> Vec<Insight> {
        if transactions.is_empty() {
            return Vec::new();
        }

        let ctx = AnalysisContext::new(transactions, today, &self.config);
        let mut insights: Vec<Insight> = Vec::new();

        for rule in &self.rules {
            let produced = rule.evaluate(&ctx);
            tracing::debug!(rule = rule.name(), count = produced.len(), "Insight rule evaluated");

            for insight in produced {
                if insights.iter().any(|i| i.id == insight.id) {
                    continue;
                }
                insights.push(insight);
            }
        }

        if insights.len() > self.config.max_insights {
            tracing::debug!(
                produced = insights.len(),
                cap = self.config.max_insights,
                "Truncating insights"
            );
            insights.truncate(self.config.max_insights);
        }

        insights
    }
}

/// Generate insights with the default engine
pub fn generate_insights(transactions: &[Transaction], today: NaiveDate) -> Vec<Insight> {
    InsightEngine::default().generate(transactions, today)
}
