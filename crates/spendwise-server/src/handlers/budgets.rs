//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    Extension, Json,
};

use super::{read_json, PeriodQuery};
use crate::{AppError, AppState, Owner, SuccessResponse};
use spendwise_core::{Analytics, Budget, BudgetStatus, NewBudget};

/// GET /api/budgets - Budgets for a month with usage and alert level
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<Vec<BudgetStatus>>, AppError> {
    let period = params.period()?;
    let statuses = Analytics::new(&state.db).budgets_with_usage(owner.as_str(), period)?;
    Ok(Json(statuses))
}

/// POST /api/budgets - Create or replace the budget for a category and month
pub async fn upsert_budget(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    request: Request,
) -> Result<(StatusCode, Json<Budget>), AppError> {
    let req: NewBudget = read_json(request).await?;
    let budget = state.db.upsert_budget(owner.as_str(), &req)?;
    Ok((StatusCode::CREATED, Json(budget)))
}

/// DELETE /api/budgets/:id - Delete one of the caller's budgets
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_budget(owner.as_str(), id)?;
    Ok(Json(SuccessResponse { success: true }))
}
