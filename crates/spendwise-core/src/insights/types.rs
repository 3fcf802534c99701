//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which rule produced an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Highest spending category and its share of the total
    TopCategory,
    /// Spend over a budget's limit
    BudgetExceeded,
    /// Spend at or above the near-limit threshold
    BudgetNearLimit,
    /// Spend went up compared to last month
    SpendingIncrease,
    /// Spend went down compared to last month
    SpendingDecrease,
    /// A single category dominates the total
    CategoryConcentration,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::TopCategory => "top_category",
            InsightKind::BudgetExceeded => "budget_exceeded",
            InsightKind::BudgetNearLimit => "budget_near_limit",
            InsightKind::SpendingIncrease => "spending_increase",
            InsightKind::SpendingDecrease => "spending_decrease",
            InsightKind::CategoryConcentration => "category_concentration",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity level of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational - no action needed
    Info,
    /// Worth attention
    Warning,
    /// Requires immediate attention
    Alert,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Alert => "alert",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single generated observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub text: String,
    pub severity: Severity,
    pub kind: InsightKind,
}

impl Insight {
    pub fn new(kind: InsightKind, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity,
            kind,
        }
    }
}

/// Insights for one owner and period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightReport {
    pub month: u32,
    pub year: i32,
    pub insights: Vec<Insight>,
}
