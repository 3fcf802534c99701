//! Report command implementations

use anyhow::Result;
use spendwise_core::insights::format_amount;
use spendwise_core::{Analytics, Database};

use super::{resolve_period, truncate};
use crate::cli::PeriodArgs;

pub fn cmd_report_summary(db: &Database, owner: &str, period: PeriodArgs, json: bool) -> Result<()> {
    let period = resolve_period(period)?;
    let summary = Analytics::new(db).monthly_summary(owner, period)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("📊 Monthly Summary: {}", period);
    println!();
    println!("   Total spent:    {}", format_amount(summary.total_spent));
    println!("   Expenses:       {}", summary.total_expenses);
    println!("   Average:        {}", format_amount(summary.avg_expense));

    Ok(())
}

pub fn cmd_report_breakdown(
    db: &Database,
    owner: &str,
    period: PeriodArgs,
    json: bool,
) -> Result<()> {
    let period = resolve_period(period)?;
    let breakdown = Analytics::new(db).category_breakdown(owner, period)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    println!("📊 Spending by Category: {}", period);
    println!();

    if breakdown.is_empty() {
        println!("   No expenses recorded for this month.");
        return Ok(());
    }

    let total: f64 = breakdown.iter().map(|c| c.total_spent).sum();

    println!("   {:20} │ {:>12} │ {:>6}", "Category", "Spent", "Share");
    println!("   {}", "─".repeat(46));
    for row in &breakdown {
        let share = if total > 0.0 {
            row.total_spent / total * 100.0
        } else {
            0.0
        };
        println!(
            "   {:20} │ {:>12} │ {:>5.1}%",
            truncate(&row.category, 20),
            format_amount(row.total_spent),
            share
        );
    }
    println!("   {}", "─".repeat(46));
    println!("   {:20} │ {:>12} │", "Total", format_amount(total));

    Ok(())
}

pub fn cmd_report_top(db: &Database, owner: &str, period: PeriodArgs, json: bool) -> Result<()> {
    let period = resolve_period(period)?;
    let top = Analytics::new(db).top_category(owner, period)?;

    if json {
        match &top {
            Some(top) => println!("{}", serde_json::to_string_pretty(top)?),
            None => println!("{{}}"),
        }
        return Ok(());
    }

    match top {
        Some(top) => println!(
            "🏆 Top category for {}: {} ({})",
            period,
            top.category,
            format_amount(top.total_spent)
        ),
        None => println!("🏆 No spending recorded for {}", period),
    }

    Ok(())
}

pub fn cmd_report_compare(db: &Database, owner: &str, period: PeriodArgs, json: bool) -> Result<()> {
    let period = resolve_period(period)?;
    let comparison = Analytics::new(db).month_comparison(owner, period)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    let arrow = if comparison.delta() > 0.0 {
        "📈"
    } else if comparison.delta() < 0.0 {
        "📉"
    } else {
        "➡️ "
    };

    println!("📊 Month over Month: {}", period);
    println!();
    println!("   This month:     {}", format_amount(comparison.current_month));
    println!("   Last month:     {}", format_amount(comparison.previous_month));
    println!(
        "   Change:         {} {:+.2}%",
        arrow, comparison.percentage_change
    );

    Ok(())
}
