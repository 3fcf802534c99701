//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use super::read_json;
use crate::{AppError, AppState, Owner, SuccessResponse};
use spendwise_core::{Expense, ExpenseFilter, ExpenseUpdate, NewExpense, Period};

/// Query parameters for listing expenses
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseQuery {
    pub month: Option<String>,
    pub year: Option<String>,
    pub category: Option<String>,
}

impl ExpenseQuery {
    /// Month and year filter only when both are given
    fn filter(&self) -> Result<ExpenseFilter, AppError> {
        let period = match (self.month.as_deref(), self.year.as_deref()) {
            (Some(month), Some(year)) => Some(Period::from_query(Some(month), Some(year))?),
            _ => None,
        };
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);
        Ok(ExpenseFilter { period, category })
    }
}

/// POST /api/expenses - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    request: Request,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let req: NewExpense = read_json(request).await?;
    let expense = state.db.create_expense(owner.as_str(), &req)?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET /api/expenses - The caller's expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    Query(params): Query<ExpenseQuery>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let filter = params.filter()?;
    let expenses = state.db.list_expenses(owner.as_str(), &filter)?;
    Ok(Json(expenses))
}

/// PUT /api/expenses/:id - Update one of the caller's expenses
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Expense>, AppError> {
    let update: ExpenseUpdate = read_json(request).await?;
    let expense = state.db.update_expense(owner.as_str(), id, &update)?;
    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete one of the caller's expenses
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_expense(owner.as_str(), id)?;
    Ok(Json(SuccessResponse { success: true }))
}
