//! Analytics handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use super::PeriodQuery;
use crate::{AppError, AppState, Owner};
use spendwise_core::{Analytics, CategorySpend, MonthComparison, MonthlySummary};

/// GET /api/analytics/monthly-summary - Total, count and average for a month
pub async fn get_monthly_summary(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<MonthlySummary>, AppError> {
    let period = params.period()?;
    let summary = Analytics::new(&state.db).monthly_summary(owner.as_str(), period)?;
    Ok(Json(summary))
}

/// GET /api/analytics/category-breakdown - Per-category totals, largest first
pub async fn get_category_breakdown(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<Vec<CategorySpend>>, AppError> {
    let period = params.period()?;
    let breakdown = Analytics::new(&state.db).category_breakdown(owner.as_str(), period)?;
    Ok(Json(breakdown))
}

/// GET /api/analytics/top-category - Largest category, or `{}` when nothing was spent
pub async fn get_top_category(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let period = params.period()?;
    let top = Analytics::new(&state.db).top_category(owner.as_str(), period)?;

    let body = match top {
        Some(top) => serde_json::to_value(top)?,
        None => serde_json::json!({}),
    };
    Ok(Json(body))
}

/// GET /api/analytics/month-comparison - This month's total against last month's
pub async fn get_month_comparison(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<MonthComparison>, AppError> {
    let period = params.period()?;
    let comparison = Analytics::new(&state.db).month_comparison(owner.as_str(), period)?;
    Ok(Json(comparison))
}
