//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `expenses` - Expense CRUD and range queries for analytics
//! - `budgets` - Budget upsert keyed on (owner, category, month, year)
//! - `audit` - Per-owner audit trail of writes

use std::time::Duration;

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, warn};

use crate::error::Result;
use crate::period::DateRange;

mod audit;
mod budgets;
mod expenses;


pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable overriding the store timeout, in milliseconds
pub const STORE_TIMEOUT_ENV: &str = "SPENDWISE_STORE_TIMEOUT_MS";

/// Default bound on a single store round trip
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Format used for every timestamp column
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Connection settings for the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Applied both as the pool checkout timeout and the SQLite busy timeout
    pub timeout: Duration,
    pub max_connections: u32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_STORE_TIMEOUT,
            max_connections: 10,
        }
    }
}

impl StoreOptions {
    /// Defaults, with the timeout taken from `SPENDWISE_STORE_TIMEOUT_MS` if set
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(raw) = std::env::var(STORE_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => options.timeout = Duration::from_millis(ms),
                _ => warn!(value = %raw, "Ignoring invalid {}", STORE_TIMEOUT_ENV),
            }
        }
        options
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Format a timestamp the way SQLite's `CURRENT_TIMESTAMP` does
pub(crate) fn format_datetime(at: &DateTime<Utc>) -> String {
    at.format(DATETIME_FORMAT).to_string()
}

/// Text bounds for matching stored timestamps against a half-open range
///
/// The exclusive end is written as `24:00:00` on the range's last day, so it
/// stays a four-digit year when the range ends on 10000-01-01.
pub(crate) fn range_bounds(range: &DateRange) -> (String, String) {
    let last_day = range.end.pred_opt().unwrap_or(range.end);
    (
        range.start.format("%Y-%m-%d").to_string(),
        format!("{} 24:00:00", last_day.format("%Y-%m-%d")),
    )
}

/// Parse a stored timestamp column
pub(crate) fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) a database with default store options
    pub fn new(path: &str) -> Result<Self> {
        Self::new_with_options(path, StoreOptions::default())
    }

    /// Open (or create) a database with explicit store options
    pub fn new_with_options(path: &str, options: StoreOptions) -> Result<Self> {
        let busy_timeout = options.timeout;
        let manager =
            SqliteConnectionManager::file(path).with_init(move |conn| conn.busy_timeout(busy_timeout));

        let pool = Pool::builder()
            .max_size(options.max_connections)
            .connection_timeout(options.timeout)
            .build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;
        debug!(path, timeout_ms = options.timeout.as_millis() as u64, "Database opened");

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a unique temporary file rather than `:memory:` so every pooled
    /// connection sees the same data.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "spendwise_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any leftover file from an earlier run
        let _ = std::fs::remove_file(&path);

        Self::new(&path.to_string_lossy())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the budget upsert writer
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            -- Expenses
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY,
                owner_id TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT,
                payment_method TEXT NOT NULL DEFAULT 'cash',   -- cash, upi, card
                date DATETIME NOT NULL,                        -- UTC, YYYY-MM-DD HH:MM:SS
                auto_categorized BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_owner_date ON expenses(owner_id, date);
            CREATE INDEX IF NOT EXISTS idx_expenses_owner_category ON expenses(owner_id, category);

            -- Budgets (one per owner, category and month)
            CREATE TABLE IF NOT EXISTS budgets (
                id INTEGER PRIMARY KEY,
                owner_id TEXT NOT NULL,
                category TEXT NOT NULL,
                monthly_limit REAL NOT NULL,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(owner_id, category, month, year)
            );

            CREATE INDEX IF NOT EXISTS idx_budgets_owner_period ON budgets(owner_id, year, month);

            -- Audit log (writes, per owner)
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP,
                owner_id TEXT NOT NULL,
                action TEXT NOT NULL,
                entity_type TEXT,
                entity_id INTEGER,
                details TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_audit_log_owner ON audit_log(owner_id);
            CREATE INDEX IF NOT EXISTS idx_audit_log_timestamp ON audit_log(timestamp);
            "#,
        )?;

        Ok(())
    }
}
