//! Total spending change against the previous window

use rust_decimal::Decimal;

use crate::analytics::change_percent;
use crate::money;

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Impact, Insight, InsightType};

pub struct PeriodChangeRule;

impl InsightRule for PeriodChangeRule {
    fn name(&self) -> &'static str {
        "period_change"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        if ctx.previous.is_empty() || ctx.previous_total <= Decimal::ZERO {
            return vec![];
        }
        let Some(change) = change_percent(ctx.total, ctx.previous_total) else {
            return vec![];
        };
        if change.abs() <= ctx.config.period_change {
            return vec![];
        }

        let impact = if change.abs() > ctx.config.period_change_high {
            Impact::High
        } else {
            Impact::Medium
        };

        let insight = if change > 0.0 {
            Insight::new(
                "period-change",
                InsightType::Spending,
                impact,
                format!("Spending Up {:.0}%", change),
                format!(
                    "You've spent {} {} compared to {} last month.",
                    money::format_usd(ctx.total),
                    ctx.period_label(),
                    money::format_usd(ctx.previous_total)
                ),
            )
        } else {
            Insight::new(
                "period-change",
                InsightType::Saving,
                impact,
                format!("Spending Down {:.0}%", change.abs()),
                format!(
                    "Nice work! You've spent {} {}, down from {} last month.",
                    money::format_usd(ctx.total),
                    ctx.period_label(),
                    money::format_usd(ctx.previous_total)
                ),
            )
        };

        vec![insight]
    }
}
