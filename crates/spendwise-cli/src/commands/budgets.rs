//! Budget command implementations

use anyhow::{Context, Result};
use spendwise_core::analytics::BudgetStatus;
use spendwise_core::insights::format_amount;
use spendwise_core::{AlertLevel, Analytics, Budget, Database, NewBudget};

use super::{resolve_period, truncate};
use crate::cli::PeriodArgs;

pub fn cmd_budgets_set(
    db: &Database,
    owner: &str,
    category: &str,
    limit: f64,
    period: PeriodArgs,
) -> Result<Budget> {
    let period = resolve_period(period)?;
    let budget = db
        .upsert_budget(
            owner,
            &NewBudget {
                category: category.to_string(),
                monthly_limit: limit,
                month: period.month(),
                year: period.year(),
            },
        )
        .context("Failed to set budget")?;

    println!(
        "✅ Budget #{} for {} in {}: {}",
        budget.id,
        budget.category,
        period,
        format_amount(budget.monthly_limit)
    );

    Ok(budget)
}

pub fn cmd_budgets_list(db: &Database, owner: &str, period: PeriodArgs, json: bool) -> Result<()> {
    let period = resolve_period(period)?;
    let statuses = Analytics::new(db).budgets_with_usage(owner, period)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!("💰 Budgets for {}", period);
    println!();

    if statuses.is_empty() {
        println!("   No budgets set. Add one with: spendwise budgets set <CATEGORY> <LIMIT>");
        return Ok(());
    }

    println!(
        "   {:>4} │ {:15} │ {:>12} │ {:>12} │ {:>8} │ Status",
        "ID", "Category", "Limit", "Spent", "Used"
    );
    println!("   {}", "─".repeat(78));

    for status in &statuses {
        match status {
            BudgetStatus::Evaluated(usage) => {
                let icon = match usage.alert {
                    AlertLevel::Within => "✅",
                    AlertLevel::Near => "⚠️ ",
                    AlertLevel::Exceeded => "🚨",
                };
                println!(
                    "   {:>4} │ {:15} │ {:>12} │ {:>12} │ {:>7.2}% │ {} {}",
                    usage.budget_id,
                    truncate(&usage.category, 15),
                    format_amount(usage.limit),
                    format_amount(usage.spent),
                    usage.percentage_used,
                    icon,
                    usage.alert.label()
                );
            }
            BudgetStatus::Invalid(entry) => {
                println!(
                    "   {:>4} │ {:15} │ {:>12} │ {:>12} │ {:>8} │ ❌ {}",
                    entry.budget_id,
                    truncate(&entry.category, 15),
                    format_amount(entry.limit),
                    "-",
                    "-",
                    entry.error
                );
            }
        }
    }

    Ok(())
}

pub fn cmd_budgets_delete(db: &Database, owner: &str, id: i64) -> Result<()> {
    db.delete_budget(owner, id)
        .with_context(|| format!("Failed to delete budget #{}", id))?;
    println!("🗑️  Deleted budget #{}", id);
    Ok(())
}
