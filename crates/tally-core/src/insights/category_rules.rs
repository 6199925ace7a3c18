//! Category Insights
//!
//! - Top category dominance within the analyzed window
//! - Per-category shifts against the previous window

use rust_decimal::Decimal;

use crate::analytics::{aggregate::group_totals, GroupBy};
use crate::money;

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Impact, Insight, InsightType};

/// Flags the leading category when it takes an outsized share of spend
pub struct TopCategoryRule;

impl InsightRule for TopCategoryRule {
    fn name(&self) -> &'static str {
        "top_category"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let Some(top) = ctx.categories.first() else {
            return vec![];
        };

        let share = top.percentage;
        if share <= ctx.config.dominance_share {
            return vec![];
        }

        let impact = if share > ctx.config.dominance_high_share {
            Impact::High
        } else {
            Impact::Medium
        };

        vec![Insight::new(
            format!("top-category:{}", top.key),
            InsightType::Spending,
            impact,
            format!("High {} Spending", top.key),
            format!(
                "You've spent {} on {} {}, which is {:.1}% of your total spending.",
                money::format_usd(top.amount),
                top.key,
                ctx.period_label(),
                share
            ),
        )
        .with_category(top.key.clone())]
    }
}

/// Categories whose spend moved sharply versus the previous window
pub struct CategoryShiftRule;

impl InsightRule for CategoryShiftRule {
    fn name(&self) -> &'static str {
        "category_shift"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        if ctx.previous.is_empty() {
            return vec![];
        }

        let previous = group_totals(ctx.previous.iter().copied(), GroupBy::Category);
        let current = group_totals(ctx.current.iter().copied(), GroupBy::Category);

        // Current categories in ranked order, then ones that dropped to zero
        let mut subjects: Vec<(String, Decimal)> = ctx
            .categories
            .iter()
            .map(|p| (p.key.clone(), p.amount))
            .collect();
        for (key, _, _) in &previous {
            if !current.iter().any(|(k, _, _)| k == key) {
                subjects.push((key.clone(), Decimal::ZERO));
            }
        }

        let mut insights = Vec::new();
        for (category, amount) in subjects {
            let Some(prior) = previous
                .iter()
                .find(|(k, _, _)| *k == category)
                .map(|(_, amount, _)| *amount)
            else {
                continue;
            };
            if prior <= Decimal::ZERO {
                continue;
            }

            let change = money::ratio(amount.saturating_sub(prior), prior) * 100.0;
            if change.abs() <= ctx.config.category_shift {
                continue;
            }

            let impact = if change.abs() > ctx.config.category_shift_high {
                Impact::High
            } else {
                Impact::Medium
            };

            let insight = if change > 0.0 {
                Insight::new(
                    format!("category-shift:{}", category),
                    InsightType::Spending,
                    impact,
                    format!("{} Spending Increased", category),
                    format!(
                        "{} spending is up {:.0}% from last month ({} vs {}).",
                        category,
                        change,
                        money::format_usd(amount),
                        money::format_usd(prior)
                    ),
                )
            } else {
                Insight::new(
                    format!("category-shift:{}", category),
                    InsightType::Saving,
                    impact,
                    format!("{} Spending Decreased", category),
                    format!(
                        "{} spending is down {:.0}% from last month ({} vs {}).",
                        category,
                        change.abs(),
                        money::format_usd(amount),
                        money::format_usd(prior)
                    ),
                )
            };
            insights.push(insight.with_category(category));
        }

        insights
    }
}
