//! Insight Engine - natural-language observations about a month of spending
//!
//! A fixed, ordered set of rules runs over the period's aggregation, its
//! evaluated budgets and the comparison with the previous month.
//!
//! ## Built-in rules
//!
//! - **Top Category** - largest category and its share of the total
//! - **Budget Alerts** - budgets exceeded or near their limit
//! - **Month Over Month** - spend up or down against last month
//! - **Food Share** - food above 40% of the total

pub mod budget_alerts;
pub mod engine;
pub mod food_share;
pub mod month_over_month;
pub mod top_category;
pub mod types;

pub use budget_alerts::BudgetAlertRule;
pub use engine::{AnalysisContext, InsightEngine, InsightRule};
pub use food_share::FoodShareRule;
pub use month_over_month::MonthOverMonthRule;
pub use top_category::TopCategoryRule;
pub use types::{Insight, InsightKind, InsightReport, Severity};

/// Render an amount in rupees with two decimals, e.g. `₹1250.00`
pub fn format_amount(amount: f64) -> String {
    format!("₹{:.2}", amount)
}
