//! Budget Evaluator - joins budgets with category totals

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::aggregator::Aggregation;
use super::round2;
use crate::error::{Error, Result};
use crate::models::Budget;

/// Usage percentage at which a budget is considered near its limit
pub const NEAR_LIMIT_PERCENT: f64 = 80.0;
/// Usage percentage at which a budget is exceeded (inclusive)
pub const EXCEEDED_PERCENT: f64 = 100.0;

/// How much of a budget has been consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Within,
    Near,
    Exceeded,
}

impl AlertLevel {
    /// Classify a (rounded) usage percentage; first matching threshold wins
    pub fn from_percentage(percentage_used: f64) -> Self {
        if percentage_used >= EXCEEDED_PERCENT {
            AlertLevel::Exceeded
        } else if percentage_used >= NEAR_LIMIT_PERCENT {
            AlertLevel::Near
        } else {
            AlertLevel::Within
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Within => "within",
            AlertLevel::Near => "near",
            AlertLevel::Exceeded => "exceeded",
        }
    }

    /// Human-readable label for tables
    pub fn label(&self) -> &'static str {
        match self {
            AlertLevel::Within => "Within budget",
            AlertLevel::Near => "Near budget limit",
            AlertLevel::Exceeded => "Budget exceeded",
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A budget evaluated against actual spend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    pub budget_id: i64,
    pub category: String,
    pub limit: f64,
    pub spent: f64,
    pub percentage_used: f64,
    pub alert: AlertLevel,
}

/// A budget that could not be evaluated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidBudgetEntry {
    pub budget_id: i64,
    pub category: String,
    pub limit: f64,
    pub error: String,
}

/// One line of the budgets-with-usage report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BudgetStatus {
    Evaluated(BudgetUsage),
    Invalid(InvalidBudgetEntry),
}

impl BudgetStatus {
    pub fn usage(&self) -> Option<&BudgetUsage> {
        match self {
            BudgetStatus::Evaluated(usage) => Some(usage),
            BudgetStatus::Invalid(_) => None,
        }
    }
}

/// Evaluate a single budget against the period's category totals
pub fn evaluate_budget(budget: &Budget, totals: &Aggregation) -> Result<BudgetUsage> {
    if !budget.monthly_limit.is_finite() || budget.monthly_limit <= 0.0 {
        return Err(Error::InvalidBudget {
            category: budget.category.clone(),
            limit: budget.monthly_limit,
        });
    }

    let spent = totals.total_for(&budget.category);
    let percentage_used = round2(spent / budget.monthly_limit * 100.0);

    Ok(BudgetUsage {
        budget_id: budget.id,
        category: budget.category.clone(),
        limit: budget.monthly_limit,
        spent,
        percentage_used,
        alert: AlertLevel::from_percentage(percentage_used),
    })
}

/// Evaluate every budget in iteration order.
///
/// An invalid budget fails only its own entry; the others still evaluate.
pub fn evaluate_budgets(budgets: &[Budget], totals: &Aggregation) -> Vec<Result<BudgetUsage>> {
    budgets
        .iter()
        .map(|budget| {
            let result = evaluate_budget(budget, totals);
            if let Err(ref e) = result {
                warn!(budget_id = budget.id, error = %e, "Skipping invalid budget");
            }
            result
        })
        .collect()
}

/// Pair each evaluation with its budget to build the report lines
pub fn budget_statuses(budgets: &[Budget], results: Vec<Result<BudgetUsage>>) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .zip(results)
        .map(|(budget, result)| match result {
            Ok(usage) => BudgetStatus::Evaluated(usage),
            Err(e) => BudgetStatus::Invalid(InvalidBudgetEntry {
                budget_id: budget.id,
                category: budget.category.clone(),
                limit: budget.monthly_limit,
                error: e.to_string(),
            }),
        })
        .collect()
}
