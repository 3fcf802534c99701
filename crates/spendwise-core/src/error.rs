//! Error types for Spendwise

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or out-of-range request parameters (month, year)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid period: month={month}, year={year}")]
    InvalidPeriod { month: u32, year: i32 },

    /// A budget whose limit cannot be evaluated (zero, negative, or NaN)
    #[error("Invalid budget for {category}: limit {limit} must be positive")]
    InvalidBudget { category: String, limit: f64 },

    /// The store failed to answer in time; callers may retry with backoff
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl Error {
    /// Whether this error was caused by the caller's input rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidRequest(_)
                | Error::InvalidPeriod { .. }
                | Error::InvalidBudget { .. }
                | Error::InvalidData(_)
                | Error::NotFound(_)
                | Error::Forbidden(_)
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        // Lock contention that outlived the busy timeout is an availability problem
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked) => {
                Error::StoreUnavailable(err.to_string())
            }
            _ => Error::Database(err),
        }
    }
}

impl From<r2d2::Error> for Error {
    fn from(err: r2d2::Error) -> Self {
        Error::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_maps_to_store_unavailable() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".to_string()),
        );
        assert!(matches!(Error::from(err), Error::StoreUnavailable(_)));
    }

    #[test]
    fn test_other_sqlite_errors_stay_database_errors() {
        let err = rusqlite::Error::QueryReturnedNoRows;
        assert!(matches!(Error::from(err), Error::Database(_)));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::InvalidRequest("month".into()).is_client_error());
        assert!(Error::InvalidPeriod { month: 13, year: 2024 }.is_client_error());
        assert!(!Error::StoreUnavailable("timeout".into()).is_client_error());
    }
}
