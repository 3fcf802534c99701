//! Calendar periods and half-open date ranges

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Earliest accepted year
pub const MIN_YEAR: i32 = 1900;
/// Latest accepted year (keeps stored dates at four digits)
pub const MAX_YEAR: i32 = 9999;

/// Half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether the timestamp's UTC date falls inside the range
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        day >= self.start && day < self.end
    }
}

/// A calendar month identified by (month, year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Period {
    month: u32,
    year: i32,
}

/// The ranges needed to analyze one period against the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRanges {
    pub current: DateRange,
    pub previous: DateRange,
}

impl Period {
    /// Create a period, failing with `InvalidPeriod` if month or year is out of range
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::InvalidPeriod { month, year });
        }
        Ok(Self { month, year })
    }

    /// Build a period from raw request parameters
    ///
    /// Missing, unparseable, or out-of-range values are rejected with
    /// `InvalidRequest` before any aggregation runs.
    pub fn from_query(month: Option<&str>, year: Option<&str>) -> Result<Self> {
        let (Some(month), Some(year)) = (month, year) else {
            return Err(Error::InvalidRequest(
                "Month and year are required".to_string(),
            ));
        };

        let month: u32 = month
            .trim()
            .parse()
            .map_err(|_| Error::InvalidRequest(format!("Invalid month: {}", month)))?;
        let year: i32 = year
            .trim()
            .parse()
            .map_err(|_| Error::InvalidRequest(format!("Invalid year: {}", year)))?;

        Self::new(month, year).map_err(|_| {
            Error::InvalidRequest(format!(
                "Month must be 1-12 and year {}-{} (got month={}, year={})",
                MIN_YEAR, MAX_YEAR, month, year
            ))
        })
    }

    /// The period containing the given timestamp
    pub fn containing(at: DateTime<Utc>) -> Result<Self> {
        Self::new(at.month(), at.year())
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// First day of the month
    pub fn start(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or(Error::InvalidPeriod {
            month: self.month,
            year: self.year,
        })
    }

    /// `[start-of-month, start-of-next-month)`
    pub fn range(&self) -> Result<DateRange> {
        let start = self.start()?;
        let end = self.shift(start, Months::new(1), true)?;
        Ok(DateRange::new(start, end))
    }

    /// The current range and the immediately preceding month's range
    pub fn ranges(&self) -> Result<PeriodRanges> {
        let current = self.range()?;
        let previous_start = self.shift(current.start, Months::new(1), false)?;
        Ok(PeriodRanges {
            current,
            previous: DateRange::new(previous_start, current.start),
        })
    }

    fn shift(&self, date: NaiveDate, months: Months, forward: bool) -> Result<NaiveDate> {
        let shifted = if forward {
            date.checked_add_months(months)
        } else {
            date.checked_sub_months(months)
        };
        shifted.ok_or(Error::InvalidPeriod {
            month: self.month,
            year: self.year,
        })
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
