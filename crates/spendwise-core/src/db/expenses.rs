//! Expense operations

use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::info;

use super::audit::insert_audit;
use super::{format_datetime, parse_datetime, range_bounds, Database};
use crate::analytics::ExpenseStore;
use crate::error::{Error, Result};
use crate::models::{Budget, Expense, ExpenseFilter, ExpenseUpdate, NewExpense, PaymentMethod};
use crate::period::{DateRange, Period};

const EXPENSE_COLUMNS: &str =
    "id, owner_id, amount, category, description, payment_method, date, auto_categorized, created_at";

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let payment_method: String = row.get(5)?;
    let date: String = row.get(6)?;
    let created_at: String = row.get(8)?;

    Ok(Expense {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        description: row.get(4)?,
        payment_method: payment_method.parse().unwrap_or_default(),
        date: parse_datetime(6, &date)?,
        auto_categorized: row.get(7)?,
        created_at: parse_datetime(8, &created_at)?,
    })
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidData(format!(
            "Amount must be a non-negative number (got {})",
            amount
        )));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(Error::InvalidData("Category is required".to_string()));
    }
    Ok(())
}

impl Database {
    /// Record a new expense for an owner
    pub fn create_expense(&self, owner_id: &str, expense: &NewExpense) -> Result<Expense> {
        validate_amount(expense.amount)?;
        validate_category(&expense.category)?;

        let id = {
            let mut conn = self.conn()?;
            let tx = conn.transaction()?;
            tx.execute(
                r#"
                INSERT INTO expenses (owner_id, amount, category, description, payment_method, date, auto_categorized)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    owner_id,
                    expense.amount,
                    expense.category,
                    expense.description,
                    expense.payment_method.as_str(),
                    format_datetime(&expense.date),
                    expense.auto_categorized,
                ],
            )?;
            let id = tx.last_insert_rowid();
            insert_audit(
                &tx,
                owner_id,
                "create",
                Some("expense"),
                Some(id),
                Some(&format!("{} {:.2}", expense.category, expense.amount)),
            )?;
            tx.commit()?;
            id
        };

        info!(owner = owner_id, id, category = %expense.category, "Expense recorded");

        self.get_expense(id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))
    }

    /// Get an expense by ID regardless of owner
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
                params![id],
                expense_from_row,
            )
            .optional()?;
        Ok(expense)
    }

    /// Fetch an expense the caller owns
    ///
    /// Unknown IDs are `NotFound`; another owner's expense is `Forbidden`.
    pub fn get_owned_expense(&self, owner_id: &str, id: i64) -> Result<Expense> {
        let expense = self
            .get_expense(id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))?;
        if expense.owner_id != owner_id {
            return Err(Error::Forbidden(format!("Expense {} belongs to another owner", id)));
        }
        Ok(expense)
    }

    /// List an owner's expenses, newest first
    pub fn list_expenses(&self, owner_id: &str, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut conditions = vec!["owner_id = ?"];
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(owner_id.to_string())];

        if let Some(period) = filter.period {
            let (start, end) = range_bounds(&period.range()?);
            conditions.push("date >= ?");
            conditions.push("date < ?");
            values.push(Box::new(start));
            values.push(Box::new(end));
        }
        if let Some(ref category) = filter.category {
            conditions.push("category = ?");
            values.push(Box::new(category.clone()));
        }

        let sql = format!(
            "SELECT {} FROM expenses WHERE {} ORDER BY date DESC, id DESC",
            EXPENSE_COLUMNS,
            conditions.join(" AND ")
        );

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(params_from_iter(values.iter()), expense_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Apply a partial update to an expense the caller owns
    pub fn update_expense(&self, owner_id: &str, id: i64, update: &ExpenseUpdate) -> Result<Expense> {
        let current = self.get_owned_expense(owner_id, id)?;

        let amount = update.amount.unwrap_or(current.amount);
        let category = update.category.clone().unwrap_or(current.category);
        let description = update.description.clone().or(current.description);
        let payment_method: PaymentMethod = update.payment_method.unwrap_or(current.payment_method);
        let date = update.date.unwrap_or(current.date);

        validate_amount(amount)?;
        validate_category(&category)?;

        {
            let mut conn = self.conn()?;
            let tx = conn.transaction()?;
            tx.execute(
                r#"
                UPDATE expenses
                SET amount = ?, category = ?, description = ?, payment_method = ?, date = ?
                WHERE id = ? AND owner_id = ?
                "#,
                params![
                    amount,
                    category,
                    description,
                    payment_method.as_str(),
                    format_datetime(&date),
                    id,
                    owner_id,
                ],
            )?;
            insert_audit(&tx, owner_id, "update", Some("expense"), Some(id), None)?;
            tx.commit()?;
        }

        info!(owner = owner_id, id, "Expense updated");

        self.get_owned_expense(owner_id, id)
    }

    /// Delete an expense the caller owns
    pub fn delete_expense(&self, owner_id: &str, id: i64) -> Result<()> {
        self.get_owned_expense(owner_id, id)?;

        {
            let mut conn = self.conn()?;
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM expenses WHERE id = ? AND owner_id = ?",
                params![id, owner_id],
            )?;
            insert_audit(&tx, owner_id, "delete", Some("expense"), Some(id), None)?;
            tx.commit()?;
        }

        info!(owner = owner_id, id, "Expense deleted");
        Ok(())
    }

    /// Expenses in `[range.start, range.end)`, optionally for one category
    pub fn expenses_in_range(
        &self,
        owner_id: &str,
        range: DateRange,
        category: Option<&str>,
    ) -> Result<Vec<Expense>> {
        let (start, end) = range_bounds(&range);
        let conn = self.conn()?;
        // Stored dates sort lexically, so text bounds select whole days
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM expenses
            WHERE owner_id = ?1 AND date >= ?2 AND date < ?3
              AND (?4 IS NULL OR category = ?4)
            ORDER BY date, id
            "#,
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(
                params![owner_id, start, end, category],
                expense_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }
}

impl ExpenseStore for Database {
    fn expenses_in_range(
        &self,
        owner_id: &str,
        range: DateRange,
        category: Option<&str>,
    ) -> Result<Vec<Expense>> {
        Database::expenses_in_range(self, owner_id, range, category)
    }

    fn budgets_for_period(&self, owner_id: &str, period: Period) -> Result<Vec<Budget>> {
        self.list_budgets(owner_id, Some(period))
    }
}
