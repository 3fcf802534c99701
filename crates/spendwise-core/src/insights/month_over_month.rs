//! Month-over-Month Insight
//!
//! Reports the change in total spend against the previous month.

use super::engine::{AnalysisContext, InsightRule};
use super::format_amount;
use super::types::{Insight, InsightKind, Severity};

pub struct MonthOverMonthRule;

impl InsightRule for MonthOverMonthRule {
    fn id(&self) -> &'static str {
        "month_over_month"
    }

    fn name(&self) -> &'static str {
        "Month Over Month"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let cmp = ctx.comparison;
        // No baseline to compare against
        if cmp.previous_month <= 0.0 {
            return vec![];
        }

        let delta = cmp.delta();
        let insight = if delta > 0.0 {
            Insight::new(
                InsightKind::SpendingIncrease,
                Severity::Warning,
                format!(
                    "Your spending increased by {} compared to last month.",
                    format_amount(delta)
                ),
            )
        } else if delta < 0.0 {
            Insight::new(
                InsightKind::SpendingDecrease,
                Severity::Info,
                format!(
                    "Good job! You spent {} less than last month.",
                    format_amount(-delta)
                ),
            )
        } else {
            return vec![];
        };

        vec![insight]
    }
}
