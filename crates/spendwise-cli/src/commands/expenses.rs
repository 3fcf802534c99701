//! Expense command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use spendwise_core::insights::format_amount;
use spendwise_core::{Database, Expense, ExpenseFilter, ExpenseUpdate, NewExpense, PaymentMethod};

use super::{parse_date, resolve_period, truncate};
use crate::cli::PeriodArgs;

/// Optional fields for `expenses update`, as given on the command line
#[derive(Debug, Default)]
pub struct ExpenseChanges {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub date: Option<String>,
}

fn parse_payment_method(raw: &str) -> Result<PaymentMethod> {
    raw.parse::<PaymentMethod>()
        .map_err(|e| anyhow::anyhow!("{} (expected cash, upi or card)", e))
}

pub fn cmd_expenses_add(
    db: &Database,
    owner: &str,
    amount: f64,
    category: &str,
    description: Option<&str>,
    payment_method: &str,
    date: Option<&str>,
) -> Result<Expense> {
    let date = match date {
        Some(raw) => parse_date(raw)?,
        None => Utc::now(),
    };

    let mut expense =
        NewExpense::new(amount, category, date).with_payment_method(parse_payment_method(payment_method)?);
    if let Some(desc) = description {
        expense = expense.with_description(desc);
    }

    let created = db
        .create_expense(owner, &expense)
        .context("Failed to record expense")?;

    println!(
        "✅ Recorded expense #{}: {} on {} ({})",
        created.id,
        format_amount(created.amount),
        created.category,
        created.date.format("%Y-%m-%d")
    );

    Ok(created)
}

pub fn cmd_expenses_list(
    db: &Database,
    owner: &str,
    period: PeriodArgs,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    // Listing without --month/--year shows everything
    let period = if period.month.is_some() || period.year.is_some() {
        Some(resolve_period(period)?)
    } else {
        None
    };

    let filter = ExpenseFilter {
        period,
        category: category.map(str::to_string),
    };
    let expenses = db.list_expenses(owner, &filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&expenses)?);
        return Ok(());
    }

    if expenses.is_empty() {
        println!("No expenses found.");
        return Ok(());
    }

    println!(
        "{:>6} │ {:10} │ {:>12} │ {:15} │ {:5} │ Description",
        "ID", "Date", "Amount", "Category", "Paid"
    );
    println!("{}", "─".repeat(80));

    for e in &expenses {
        println!(
            "{:>6} │ {:10} │ {:>12} │ {:15} │ {:5} │ {}",
            e.id,
            e.date.format("%Y-%m-%d"),
            format_amount(e.amount),
            truncate(&e.category, 15),
            e.payment_method.as_str(),
            truncate(e.description.as_deref().unwrap_or(""), 30)
        );
    }

    println!();
    println!("{} expense(s)", expenses.len());

    Ok(())
}

pub fn cmd_expenses_update(
    db: &Database,
    owner: &str,
    id: i64,
    changes: ExpenseChanges,
) -> Result<()> {
    let update = ExpenseUpdate {
        amount: changes.amount,
        category: changes.category,
        description: changes.description,
        payment_method: changes
            .payment_method
            .as_deref()
            .map(parse_payment_method)
            .transpose()?,
        date: changes.date.as_deref().map(parse_date).transpose()?,
    };

    let updated = db
        .update_expense(owner, id, &update)
        .with_context(|| format!("Failed to update expense #{}", id))?;

    println!(
        "✅ Updated expense #{}: {} on {} ({})",
        updated.id,
        format_amount(updated.amount),
        updated.category,
        updated.date.format("%Y-%m-%d")
    );

    Ok(())
}

pub fn cmd_expenses_delete(db: &Database, owner: &str, id: i64) -> Result<()> {
    db.delete_expense(owner, id)
        .with_context(|| format!("Failed to delete expense #{}", id))?;
    println!("🗑️  Deleted expense #{}", id);
    Ok(())
}
