//! Spending pattern insights: large purchases, weekend habits and payment mix

use chrono::{Datelike, Weekday};
use rust_decimal::Decimal;

use crate::analytics::GroupBy;
use crate::models::Transaction;
use crate::money;

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Impact, Insight, InsightType};

/// Transactions well above the average, reported together
pub struct LargeTransactionRule;

impl InsightRule for LargeTransactionRule {
    fn name(&self) -> &'static str {
        "large_transactions"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        if ctx.average <= Decimal::ZERO {
            return vec![];
        }

        let threshold = money::to_f64(ctx.average) * ctx.config.large_multiplier;
        let large: Vec<&Transaction> = ctx
            .current
            .iter()
            .copied()
            .filter(|t| money::to_f64(t.amount) > threshold)
            .collect();

        if large.is_empty() {
            return vec![];
        }

        let large_total = money::sum(large.iter().map(|t| t.amount));
        let share = money::percent_of(large_total, ctx.total);
        let impact = if share > ctx.config.large_share_high {
            Impact::High
        } else {
            Impact::Medium
        };

        let noun = if large.len() == 1 {
            "purchase"
        } else {
            "purchases"
        };

        vec![Insight::new(
            "large-transactions",
            InsightType::Spending,
            impact,
            "Large Purchases",
            format!(
                "{} {} above {} made up {} ({:.1}% of your spending {}).",
                large.len(),
                noun,
                money::format_usd(Decimal::try_from(threshold).unwrap_or(ctx.average)),
                money::format_usd(large_total),
                share,
                ctx.period_label()
            ),
        )]
    }
}

/// Spending concentrated on Saturdays and Sundays
pub struct WeekendRule;

impl InsightRule for WeekendRule {
    fn name(&self) -> &'static str {
        "weekend_concentration"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        if ctx.total <= Decimal::ZERO {
            return vec![];
        }

        let weekend = money::sum(
            ctx.current
                .iter()
                .filter(|t| matches!(t.date.weekday(), Weekday::Sat | Weekday::Sun))
                .map(|t| t.amount),
        );
        let share = money::percent_of(weekend, ctx.total);
        if share <= ctx.config.weekend_share {
            return vec![];
        }

        let impact = if share > ctx.config.weekend_high_share {
            Impact::High
        } else {
            Impact::Low
        };

        vec![Insight::new(
            "weekend-spending",
            InsightType::Spending,
            impact,
            "Weekend Spending",
            format!(
                "{:.0}% of your spending {} happens on weekends ({}). \
                 Planning weekend activities ahead can help.",
                share,
                ctx.period_label(),
                money::format_usd(weekend)
            ),
        )]
    }
}

/// One payment method carrying nearly all spend
pub struct PaymentConcentrationRule;

impl InsightRule for PaymentConcentrationRule {
    fn name(&self) -> &'static str {
        "payment_concentration"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let methods = ctx.grouped(GroupBy::PaymentMethod);
        let Some(top) = methods.first() else {
            return vec![];
        };
        if top.percentage <= ctx.config.payment_share {
            return vec![];
        }

        vec![Insight::new(
            format!("payment-concentration:{}", top.key),
            InsightType::Recommendation,
            Impact::Medium,
            format!("Mostly {}", top.key),
            format!(
                "{:.0}% of your spending goes through {}. \
                 Check that it earns the best rewards for your top categories.",
                top.percentage, top.key
            ),
        )]
    }
}
