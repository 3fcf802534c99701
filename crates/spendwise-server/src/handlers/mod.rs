//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analytics;
pub mod audit;
pub mod budgets;
pub mod expenses;
pub mod insights;

// Re-export all handlers for use in router
pub use analytics::*;
pub use audit::*;
pub use budgets::*;
pub use expenses::*;
pub use insights::*;

use axum::extract::Request;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{AppError, MAX_BODY_SIZE};
use spendwise_core::Period;

/// `?month=&year=` query parameters
///
/// Kept as raw strings so bad values surface as a 400 from period parsing
/// rather than a generic extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

impl PeriodQuery {
    /// The requested period; both parameters are required
    pub fn period(&self) -> Result<Period, AppError> {
        Ok(Period::from_query(
            self.month.as_deref(),
            self.year.as_deref(),
        )?)
    }
}

/// Read and deserialize a JSON request body
pub(crate) async fn read_json<T: DeserializeOwned>(request: Request) -> Result<T, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}
