//! Budget operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::audit::insert_audit;
use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Budget, NewBudget};
use crate::period::Period;

const BUDGET_COLUMNS: &str = "id, owner_id, category, monthly_limit, month, year, created_at, updated_at";

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<Budget> {
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(Budget {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        category: row.get(2)?,
        monthly_limit: row.get(3)?,
        month: row.get(4)?,
        year: row.get(5)?,
        created_at: parse_datetime(6, &created_at)?,
        updated_at: parse_datetime(7, &updated_at)?,
    })
}

impl Database {
    /// Create or replace the budget for (owner, category, month, year)
    ///
    /// A single statement against the unique key, so concurrent calls for
    /// the same key leave exactly one row holding the last limit written.
    pub fn upsert_budget(&self, owner_id: &str, budget: &NewBudget) -> Result<Budget> {
        let period = Period::new(budget.month, budget.year)?;
        if budget.category.trim().is_empty() {
            return Err(Error::InvalidData("Category is required".to_string()));
        }
        if !budget.monthly_limit.is_finite() || budget.monthly_limit <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Monthly limit must be a positive number (got {})",
                budget.monthly_limit
            )));
        }

        let id: i64 = {
            let mut conn = self.conn()?;
            let tx = conn.transaction()?;
            let id = tx.query_row(
                r#"
                INSERT INTO budgets (owner_id, category, monthly_limit, month, year)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(owner_id, category, month, year) DO UPDATE SET
                    monthly_limit = excluded.monthly_limit,
                    updated_at = CURRENT_TIMESTAMP
                RETURNING id
                "#,
                params![
                    owner_id,
                    budget.category,
                    budget.monthly_limit,
                    period.month(),
                    period.year(),
                ],
                |row| row.get(0),
            )?;
            insert_audit(
                &tx,
                owner_id,
                "upsert",
                Some("budget"),
                Some(id),
                Some(&format!("{} {} {:.2}", budget.category, period, budget.monthly_limit)),
            )?;
            tx.commit()?;
            id
        };

        info!(owner = owner_id, id, category = %budget.category, period = %period, "Budget saved");

        self.get_budget(id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {}", id)))
    }

    /// Get a budget by ID regardless of owner
    pub fn get_budget(&self, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                &format!("SELECT {} FROM budgets WHERE id = ?", BUDGET_COLUMNS),
                params![id],
                budget_from_row,
            )
            .optional()?;
        Ok(budget)
    }

    /// List an owner's budgets, optionally for a single period
    ///
    /// Newest period first; within a period ordered by category then ID.
    pub fn list_budgets(&self, owner_id: &str, period: Option<Period>) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM budgets
            WHERE owner_id = ?1
              AND (?2 IS NULL OR (month = ?2 AND year = ?3))
            ORDER BY year DESC, month DESC, category, id
            "#,
            BUDGET_COLUMNS
        ))?;

        let budgets = stmt
            .query_map(
                params![owner_id, period.map(|p| p.month()), period.map(|p| p.year())],
                budget_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    /// Delete a budget the caller owns
    pub fn delete_budget(&self, owner_id: &str, id: i64) -> Result<()> {
        let budget = self
            .get_budget(id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {}", id)))?;
        if budget.owner_id != owner_id {
            return Err(Error::Forbidden(format!("Budget {} belongs to another owner", id)));
        }

        {
            let mut conn = self.conn()?;
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM budgets WHERE id = ? AND owner_id = ?",
                params![id, owner_id],
            )?;
            insert_audit(&tx, owner_id, "delete", Some("budget"), Some(id), None)?;
            tx.commit()?;
        }

        info!(owner = owner_id, id, "Budget deleted");
        Ok(())
    }
}
