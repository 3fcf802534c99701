//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `budgets` - Budget commands (set, list with usage, delete)
//! - `core` - Core commands (init) and shared utilities (open_db, resolve_period)
//! - `expenses` - Expense commands (add, list, update, delete)
//! - `insights` - Spending insights for a month
//! - `reports` - Report generation commands (summary, breakdown, top, compare)
//! - `serve` - Web server command

pub mod budgets;
pub mod core;
pub mod expenses;
pub mod insights;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use expenses::*;
pub use insights::*;
pub use reports::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
