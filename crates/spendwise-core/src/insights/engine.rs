//! Insight Engine - runs the registered rules over one period's analysis

use crate::analytics::{Aggregation, BudgetUsage, MonthComparison};

use super::types::Insight;
use super::{BudgetAlertRule, FoodShareRule, MonthOverMonthRule, TopCategoryRule};

/// Everything a rule may look at for one owner and period
pub struct AnalysisContext<'a> {
    /// Current-period category totals
    pub aggregation: &'a Aggregation,
    /// Successfully evaluated budgets, in budget order
    pub budgets: &'a [BudgetUsage],
    /// Current total against the previous month's
    pub comparison: &'a MonthComparison,
}

/// A single insight rule
///
/// Rules are independent: each sees the whole context and may emit any
/// number of insights.
pub trait InsightRule: Send + Sync {
    /// Stable identifier used in logs
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight>;
}

/// Ordered collection of insight rules
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules, in output order
    pub fn new() -> Self {
        let mut engine = Self::empty();

        engine.register(Box::new(TopCategoryRule));
        engine.register(Box::new(BudgetAlertRule));
        engine.register(Box::new(MonthOverMonthRule));
        engine.register(Box::new(FoodShareRule));

        engine
    }

    /// An engine with no rules registered
    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    /// Append a rule; it runs after every rule already registered
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule and concatenate the results.
    ///
    /// Output order is rule order, then each rule's emission order. No rule
    /// can stop the ones after it.
    pub fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut all = vec![];

        for rule in &self.rules {
            let insights = rule.evaluate(ctx);
            tracing::debug!(rule = rule.id(), count = insights.len(), "Insight rule complete");
            all.extend(insights);
        }

        all
    }
}
