//! Insights command implementation

use anyhow::Result;
use spendwise_core::{Analytics, Database, Severity};

use super::resolve_period;
use crate::cli::PeriodArgs;

pub fn cmd_insights(db: &Database, owner: &str, period: PeriodArgs, json: bool) -> Result<()> {
    let period = resolve_period(period)?;
    let report = Analytics::new(db).insights(owner, period)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("💡 Insights for {}", period);
    println!();

    if report.insights.is_empty() {
        println!("   Nothing to report yet. Record some expenses first.");
        return Ok(());
    }

    for insight in &report.insights {
        let icon = match insight.severity {
            Severity::Info => "ℹ️ ",
            Severity::Warning => "⚠️ ",
            Severity::Alert => "🚨",
        };
        println!("   {} {}", icon, insight.text);
    }

    Ok(())
}
