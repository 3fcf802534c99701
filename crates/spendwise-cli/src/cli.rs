//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Spendwise - Track expenses, budgets and spending insights
#[derive(Parser)]
#[command(name = "spendwise")]
#[command(about = "Personal expense tracker with budgets and spending insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "spendwise.db", global = true)]
    pub db: PathBuf,

    /// Owner whose records are read and written
    #[arg(long, default_value = "local", global = true)]
    pub owner: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Store timeout in milliseconds (overrides SPENDWISE_STORE_TIMEOUT_MS)
    #[arg(long, global = true)]
    pub store_timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Month selection shared by reporting commands (defaults to the current month)
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PeriodArgs {
    /// Month (1-12)
    #[arg(short, long)]
    pub month: Option<u32>,

    /// Year (e.g. 2024)
    #[arg(short, long)]
    pub year: Option<i32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Manage expenses (add, list, update, delete)
    Expenses {
        #[command(subcommand)]
        action: ExpensesAction,
    },

    /// Manage monthly budgets (set, list, delete)
    Budgets {
        #[command(subcommand)]
        action: BudgetsAction,
    },

    /// Spending reports for a month
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },

    /// Show spending insights for a month
    Insights {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// Unidentified requests act as the 'local' owner.
        #[arg(long)]
        no_auth: bool,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// Record an expense
    Add {
        /// Amount spent
        amount: f64,

        /// Category (case-sensitive, e.g. Food)
        category: String,

        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,

        /// Payment method: cash, upi, card
        #[arg(long, default_value = "cash")]
        payment_method: String,

        /// Date spent (YYYY-MM-DD or RFC 3339, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List expenses, newest first
    List {
        #[command(flatten)]
        period: PeriodArgs,

        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Update an expense
    Update {
        /// Expense ID
        id: i64,

        #[arg(long)]
        amount: Option<f64>,

        #[arg(long)]
        category: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        payment_method: Option<String>,

        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// Set (or replace) the monthly limit for a category
    Set {
        /// Category the budget applies to
        category: String,

        /// Monthly limit
        limit: f64,

        #[command(flatten)]
        period: PeriodArgs,
    },

    /// List budgets with usage for a month
    List {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Delete a budget
    Delete {
        /// Budget ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Total, count and average expense
    Summary {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Spending by category, largest first
    Breakdown {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// The highest spending category
    Top {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Compare against the previous month
    Compare {
        #[command(flatten)]
        period: PeriodArgs,
    },
}
