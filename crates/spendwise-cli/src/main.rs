//! Spendwise CLI - Personal expense tracker
//!
//! Usage:
//!   spendwise init                            Initialize database
//!   spendwise expenses add 250 Food           Record an expense
//!   spendwise budgets set Food 5000           Set a monthly budget
//!   spendwise report summary -m 3 -y 2024     Monthly summary
//!   spendwise insights                        Insights for this month
//!   spendwise serve --port 3000               Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let owner = cli.owner.as_str();
    let json = cli.json;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.store_timeout_ms),
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, cli.store_timeout_ms).await,
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db, cli.store_timeout_ms)?;
            match action {
                ExpensesAction::Add {
                    amount,
                    category,
                    description,
                    payment_method,
                    date,
                } => commands::cmd_expenses_add(
                    &db,
                    owner,
                    amount,
                    &category,
                    description.as_deref(),
                    &payment_method,
                    date.as_deref(),
                )
                .map(|_| ()),
                ExpensesAction::List { period, category } => {
                    commands::cmd_expenses_list(&db, owner, period, category.as_deref(), json)
                }
                ExpensesAction::Update {
                    id,
                    amount,
                    category,
                    description,
                    payment_method,
                    date,
                } => commands::cmd_expenses_update(
                    &db,
                    owner,
                    id,
                    commands::ExpenseChanges {
                        amount,
                        category,
                        description,
                        payment_method,
                        date,
                    },
                ),
                ExpensesAction::Delete { id } => commands::cmd_expenses_delete(&db, owner, id),
            }
        }
        Commands::Budgets { action } => {
            let db = commands::open_db(&cli.db, cli.store_timeout_ms)?;
            match action {
                BudgetsAction::Set {
                    category,
                    limit,
                    period,
                } => commands::cmd_budgets_set(&db, owner, &category, limit, period).map(|_| ()),
                BudgetsAction::List { period } => {
                    commands::cmd_budgets_list(&db, owner, period, json)
                }
                BudgetsAction::Delete { id } => commands::cmd_budgets_delete(&db, owner, id),
            }
        }
        Commands::Report { action } => {
            let db = commands::open_db(&cli.db, cli.store_timeout_ms)?;
            match action {
                ReportAction::Summary { period } => {
                    commands::cmd_report_summary(&db, owner, period, json)
                }
                ReportAction::Breakdown { period } => {
                    commands::cmd_report_breakdown(&db, owner, period, json)
                }
                ReportAction::Top { period } => commands::cmd_report_top(&db, owner, period, json),
                ReportAction::Compare { period } => {
                    commands::cmd_report_compare(&db, owner, period, json)
                }
            }
        }
        Commands::Insights { period } => {
            let db = commands::open_db(&cli.db, cli.store_timeout_ms)?;
            commands::cmd_insights(&db, owner, period, json)
        }
    }
}
