//! Food Share Insight
//!
//! Flags food spending that dominates the month. Matches the category
//! named exactly `Food`; other spellings are separate categories.

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Insight, InsightKind, Severity};

/// Category the advisory applies to
pub const FOOD_CATEGORY: &str = "Food";
/// Share of the total (exclusive) above which the advisory fires
pub const FOOD_SHARE_THRESHOLD: f64 = 0.4;

#[derive(Debug, Default)]
pub struct FoodShareRule;

impl InsightRule for FoodShareRule {
    fn id(&self) -> &'static str {
        "food_share"
    }

    fn name(&self) -> &'static str {
        "Food Share"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let total = ctx.aggregation.grand_total;
        if total <= 0.0 {
            return vec![];
        }

        let spent = ctx.aggregation.total_for(FOOD_CATEGORY);
        if spent / total <= FOOD_SHARE_THRESHOLD {
            return vec![];
        }

        vec![Insight::new(
            InsightKind::CategoryConcentration,
            Severity::Warning,
            format!(
                "You are spending a large portion on {}. Reducing online food orders could help you save more.",
                FOOD_CATEGORY
            ),
        )]
    }
}
