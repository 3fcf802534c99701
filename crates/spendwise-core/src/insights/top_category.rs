//! Top Category Insight
//!
//! Names the category with the most spend and its share of the total.

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Insight, InsightKind, Severity};

pub struct TopCategoryRule;

impl InsightRule for TopCategoryRule {
    fn id(&self) -> &'static str {
        "top_category"
    }

    fn name(&self) -> &'static str {
        "Top Category"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let total = ctx.aggregation.grand_total;
        if total <= 0.0 {
            return vec![];
        }

        let Some(top) = ctx.aggregation.top() else {
            return vec![];
        };

        let share = top.total_amount / total * 100.0;
        vec![Insight::new(
            InsightKind::TopCategory,
            Severity::Info,
            format!(
                "Your highest spending category is {}, accounting for {:.1}% of your total expenses.",
                top.category, share
            ),
        )]
    }
}
