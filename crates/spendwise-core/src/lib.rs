//! Spendwise Core Library
//!
//! Shared functionality for the Spendwise expense tracker:
//! - Database access and migrations
//! - Period resolution (calendar months as half-open date ranges)
//! - Analytics engine: category aggregation, budget evaluation, month-over-month comparison
//! - Insight engine producing natural-language spending observations

pub mod analytics;
pub mod db;
pub mod error;
pub mod insights;
pub mod models;
pub mod period;

pub use analytics::{
    AlertLevel, Analytics, BudgetStatus, BudgetUsage, CategorySpend, ExpenseStore,
    MonthComparison, MonthlySummary,
};
pub use db::{Database, StoreOptions};
pub use error::{Error, Result};
pub use insights::{Insight, InsightEngine, InsightKind, InsightReport, Severity};
pub use models::{
    parse_expense_date, AuditEntry, Budget, Expense, ExpenseFilter, ExpenseUpdate, NewBudget,
    NewExpense, PaymentMethod,
};
pub use period::{DateRange, Period};
