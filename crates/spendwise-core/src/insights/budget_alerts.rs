//! Budget Alert Insight
//!
//! One insight per budget that is exceeded or near its limit.

use crate::analytics::AlertLevel;

use super::engine::{AnalysisContext, InsightRule};
use super::format_amount;
use super::types::{Insight, InsightKind, Severity};

pub struct BudgetAlertRule;

impl InsightRule for BudgetAlertRule {
    fn id(&self) -> &'static str {
        "budget_alerts"
    }

    fn name(&self) -> &'static str {
        "Budget Alerts"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        ctx.budgets
            .iter()
            .filter_map(|usage| match usage.alert {
                AlertLevel::Exceeded => {
                    // A rounded 100.00% can sit a hair under the limit
                    let over = (usage.spent - usage.limit).max(0.0);
                    Some(Insight::new(
                        InsightKind::BudgetExceeded,
                        Severity::Alert,
                        format!(
                            "You overspent on {} by {}.",
                            usage.category,
                            format_amount(over)
                        ),
                    ))
                }
                AlertLevel::Near => Some(Insight::new(
                    InsightKind::BudgetNearLimit,
                    Severity::Warning,
                    format!("You are close to exceeding your {} budget.", usage.category),
                )),
                AlertLevel::Within => None,
            })
            .collect()
    }
}
