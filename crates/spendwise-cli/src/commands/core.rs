//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `resolve_period` - Turn `--month`/`--year` into a validated period
//! - `parse_date` - Parse `--date` values
//! - `cmd_init` - Initialize the database

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use spendwise_core::{parse_expense_date, Database, Period, StoreOptions};

use crate::cli::PeriodArgs;

/// Open the database, honouring `--store-timeout-ms` over the environment
pub fn open_db(db_path: &Path, store_timeout_ms: Option<u64>) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;

    let mut options = StoreOptions::from_env();
    if let Some(ms) = store_timeout_ms {
        options = options.with_timeout(Duration::from_millis(ms));
    }

    Database::new_with_options(path_str, options).context("Failed to open database")
}

/// Missing month or year falls back to the current month
pub fn resolve_period(args: PeriodArgs) -> Result<Period> {
    let current = Period::containing(Utc::now()).context("Clock is outside supported years")?;
    let month = args.month.unwrap_or(current.month());
    let year = args.year.unwrap_or(current.year());
    Period::new(month, year).context("Invalid --month/--year")
}

/// Parse a CLI date: `YYYY-MM-DD` (midnight UTC) or RFC 3339
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    parse_expense_date(raw)
        .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD)", raw.trim()))
}

pub fn cmd_init(db_path: &Path, store_timeout_ms: Option<u64>) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, store_timeout_ms)?;
    println!("   Schema ready: {}", db.path());

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: spendwise expenses add 250 Food -d lunch");
    println!("  2. Set a budget: spendwise budgets set Food 5000");
    println!("  3. See insights: spendwise insights");
    println!("  4. Start web API: spendwise serve");

    Ok(())
}
