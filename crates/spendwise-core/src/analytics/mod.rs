//! Analytics Engine - per-period aggregation, budgets, comparison and insights
//!
//! Every operation is a pure read over one owner's records for one period.
//! Results are computed fresh on each call; nothing is cached between calls.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendwise_core::{Analytics, Database, Period};
//!
//! let db = Database::new("spendwise.db")?;
//! let analytics = Analytics::new(&db);
//! let summary = analytics.monthly_summary("alice", Period::new(3, 2024)?)?;
//! ```

pub mod aggregator;
pub mod budget;
pub mod comparison;

pub use aggregator::{aggregate, Aggregation, CategorySpend, CategoryTotal, MonthlySummary};
pub use budget::{
    budget_statuses, evaluate_budget, evaluate_budgets, AlertLevel, BudgetStatus, BudgetUsage,
    InvalidBudgetEntry,
};
pub use comparison::{percentage_change, MonthComparison};

use tracing::debug;

use crate::error::Result;
use crate::insights::{AnalysisContext, InsightEngine, InsightReport};
use crate::models::{Budget, Expense};
use crate::period::{DateRange, Period};

/// Round half away from zero to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Read access to the records the engine aggregates over
///
/// Implementations must return only rows belonging to `owner_id`.
pub trait ExpenseStore {
    /// Expenses whose date falls in `[range.start, range.end)`
    fn expenses_in_range(
        &self,
        owner_id: &str,
        range: DateRange,
        category: Option<&str>,
    ) -> Result<Vec<Expense>>;

    /// Budgets set for exactly this period, in a stable order
    fn budgets_for_period(&self, owner_id: &str, period: Period) -> Result<Vec<Budget>>;
}

/// Entry point for the analytics operations
pub struct Analytics<'a, S: ExpenseStore + ?Sized> {
    store: &'a S,
    engine: InsightEngine,
}

impl<'a, S: ExpenseStore + ?Sized> Analytics<'a, S> {
    /// Analytics over `store` with the built-in insight rules
    pub fn new(store: &'a S) -> Self {
        Self::with_engine(store, InsightEngine::new())
    }

    pub fn with_engine(store: &'a S, engine: InsightEngine) -> Self {
        Self { store, engine }
    }

    /// Aggregate an owner's expenses over an arbitrary range
    pub fn aggregate(
        &self,
        owner_id: &str,
        range: DateRange,
        category: Option<&str>,
    ) -> Result<Aggregation> {
        let expenses = self.store.expenses_in_range(owner_id, range, category)?;
        let aggregation = aggregate(&expenses);
        debug!(
            owner = owner_id,
            start = %range.start,
            end = %range.end,
            expenses = aggregation.grand_count,
            categories = aggregation.categories.len(),
            "Aggregated expenses"
        );
        Ok(aggregation)
    }

    fn aggregate_period(&self, owner_id: &str, period: Period) -> Result<Aggregation> {
        self.aggregate(owner_id, period.range()?, None)
    }

    /// Total, count and average expense for the period
    pub fn monthly_summary(&self, owner_id: &str, period: Period) -> Result<MonthlySummary> {
        Ok(self.aggregate_period(owner_id, period)?.summary())
    }

    /// Per-category totals, largest first
    pub fn category_breakdown(&self, owner_id: &str, period: Period) -> Result<Vec<CategorySpend>> {
        Ok(self.aggregate_period(owner_id, period)?.breakdown())
    }

    /// The category with the most spend, or `None` when nothing was spent
    pub fn top_category(&self, owner_id: &str, period: Period) -> Result<Option<CategorySpend>> {
        let aggregation = self.aggregate_period(owner_id, period)?;
        Ok(aggregation.top().map(|top| CategorySpend {
            category: top.category.clone(),
            total_spent: top.total_amount,
        }))
    }

    /// This period's total against the previous month's
    pub fn month_comparison(&self, owner_id: &str, period: Period) -> Result<MonthComparison> {
        let ranges = period.ranges()?;
        let current = self.aggregate(owner_id, ranges.current, None)?;
        let previous = self.aggregate(owner_id, ranges.previous, None)?;
        Ok(MonthComparison::between(
            current.grand_total,
            previous.grand_total,
        ))
    }

    /// Every budget for the period, evaluated against actual spend
    ///
    /// Invalid budgets are reported inline instead of failing the call.
    pub fn budgets_with_usage(&self, owner_id: &str, period: Period) -> Result<Vec<BudgetStatus>> {
        let budgets = self.store.budgets_for_period(owner_id, period)?;
        let aggregation = self.aggregate_period(owner_id, period)?;
        let results = evaluate_budgets(&budgets, &aggregation);
        Ok(budget_statuses(&budgets, results))
    }

    /// Run the insight rules for the period
    pub fn insights(&self, owner_id: &str, period: Period) -> Result<InsightReport> {
        let ranges = period.ranges()?;
        let current = self.aggregate(owner_id, ranges.current, None)?;
        let previous = self.aggregate(owner_id, ranges.previous, None)?;
        let budgets = self.store.budgets_for_period(owner_id, period)?;

        let usages: Vec<BudgetUsage> = evaluate_budgets(&budgets, &current)
            .into_iter()
            .filter_map(|result| result.ok())
            .collect();
        let comparison = MonthComparison::between(current.grand_total, previous.grand_total);

        let ctx = AnalysisContext {
            aggregation: &current,
            budgets: &usages,
            comparison: &comparison,
        };

        Ok(InsightReport {
            month: period.month(),
            year: period.year(),
            insights: self.engine.analyze(&ctx),
        })
    }
}
