//! Insight handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use super::PeriodQuery;
use crate::{AppError, AppState, Owner};
use spendwise_core::{Analytics, InsightReport};

/// GET /api/insights - Generated observations for a month, in rule order
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<Owner>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<InsightReport>, AppError> {
    let period = params.period()?;
    let report = Analytics::new(&state.db).insights(owner.as_str(), period)?;
    Ok(Json(report))
}
