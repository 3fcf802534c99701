//! Comparison Engine - period-over-period change

use serde::{Deserialize, Serialize};

use super::round2;

/// Change reported when the previous period had no spend.
///
/// Also used when the current period is empty too, where the ratio is
/// undefined.
pub const NO_BASELINE_CHANGE: f64 = 100.0;

/// Totals for a period and the one before it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthComparison {
    pub current_month: f64,
    pub previous_month: f64,
    pub percentage_change: f64,
}

impl MonthComparison {
    pub fn between(current: f64, previous: f64) -> Self {
        Self {
            current_month: current,
            previous_month: previous,
            percentage_change: percentage_change(current, previous),
        }
    }

    /// Absolute difference, positive when spending went up
    pub fn delta(&self) -> f64 {
        self.current_month - self.previous_month
    }
}

/// `(current - previous) / previous × 100`, rounded to 2 places
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return NO_BASELINE_CHANGE;
    }
    round2((current - previous) / previous * 100.0)
}
