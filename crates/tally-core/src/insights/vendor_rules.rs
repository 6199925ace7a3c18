//! Vendor Insights
//!
//! - Frequently visited vendors that carry real spend
//! - Subscription and streaming charges worth reviewing

use rust_decimal::Decimal;

use crate::analytics::GroupBy;
use crate::models::Transaction;
use crate::money;

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Impact, Insight, InsightType};

/// Vendors visited at least `frequent_vendor_min_count` times
pub struct FrequentVendorRule;

impl InsightRule for FrequentVendorRule {
    fn name(&self) -> &'static str {
        "frequent_vendor"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let average = money::to_f64(ctx.average);

        ctx.grouped(GroupBy::Vendor)
            .into_iter()
            .filter(|v| v.count >= ctx.config.frequent_vendor_min_count)
            .filter(|v| money::to_f64(v.amount) > average)
            .map(|v| {
                let impact = if money::to_f64(v.amount) > average * 2.0 {
                    Impact::Medium
                } else {
                    Impact::Low
                };
                Insight::new(
                    format!("frequent-vendor:{}", v.key),
                    InsightType::Recommendation,
                    impact,
                    format!("Frequent {} Visits", v.key),
                    format!(
                        "You've visited {} {} times {} for a total of {}. \
                         Consider loyalty programs or bulk purchase discounts.",
                        v.key,
                        v.count,
                        ctx.period_label(),
                        money::format_usd(v.amount)
                    ),
                )
            })
            .collect()
    }
}

/// Recurring subscription charges as one review suggestion
pub struct SubscriptionRule;

impl SubscriptionRule {
    fn is_subscription(tx: &Transaction, known_vendors: &[String]) -> bool {
        tx.description.to_lowercase().contains("subscription")
            || known_vendors
                .iter()
                .any(|v| v.eq_ignore_ascii_case(tx.vendor.trim()))
    }
}

impl InsightRule for SubscriptionRule {
    fn name(&self) -> &'static str {
        "subscriptions"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let subscriptions: Vec<&Transaction> = ctx
            .current
            .iter()
            .copied()
            .filter(|t| Self::is_subscription(t, &ctx.config.subscription_vendors))
            .collect();

        if subscriptions.is_empty() {
            return vec![];
        }

        let total: Decimal = money::sum(subscriptions.iter().map(|t| t.amount));
        let mut vendors: Vec<&str> = Vec::new();
        for t in &subscriptions {
            if !vendors.contains(&t.vendor.as_str()) {
                vendors.push(&t.vendor);
            }
        }

        vec![Insight::new(
            "subscriptions",
            InsightType::Recommendation,
            Impact::Medium,
            "Subscription Review",
            format!(
                "You're paying {} for subscriptions ({}). \
                 Review them and cancel the ones you no longer use.",
                money::format_usd(total),
                vendors.join(", ")
            ),
        )]
    }
}
