//! Category Aggregator - groups expenses by category

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Expense;

/// Totals for one category within a range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: f64,
    pub count: usize,
    /// `total_amount / count`, or 0 for an empty partition
    pub mean: f64,
}

/// Result of aggregating one owner's expenses over one range
///
/// `categories` is ordered by category name (byte order), which makes
/// every downstream scan deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    pub categories: Vec<CategoryTotal>,
    pub grand_total: f64,
    pub grand_count: usize,
}

/// `{totalSpent, totalExpenses, avgExpense}` for a period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub total_spent: f64,
    pub total_expenses: usize,
    pub avg_expense: f64,
}

/// One row of a category breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpend {
    pub category: String,
    pub total_spent: f64,
}

/// Partition expenses by category and compute count, sum and mean per partition.
///
/// The grand total is the sum of the per-category totals (taken in category
/// order), so `Σ categories.total_amount == grand_total` holds exactly, with
/// no floating-point drift from a second summation order.
pub fn aggregate(expenses: &[Expense]) -> Aggregation {
    let mut partitions: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for expense in expenses {
        let entry = partitions.entry(expense.category.as_str()).or_insert((0.0, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let mut grand_total = 0.0;
    let mut grand_count = 0;
    let categories = partitions
        .into_iter()
        .map(|(category, (total_amount, count))| {
            grand_total += total_amount;
            grand_count += count;
            CategoryTotal {
                category: category.to_string(),
                total_amount,
                count,
                mean: if count > 0 {
                    total_amount / count as f64
                } else {
                    0.0
                },
            }
        })
        .collect();

    Aggregation {
        categories,
        grand_total,
        grand_count,
    }
}

impl Aggregation {
    /// Total for an exact (case-sensitive) category name, 0 if absent
    pub fn total_for(&self, category: &str) -> f64 {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.total_amount)
            .unwrap_or(0.0)
    }

    /// The category with the largest total.
    ///
    /// Single pass keeping the running maximum; a later category only
    /// replaces it when strictly larger, so ties go to the first category
    /// in aggregation order (alphabetical).
    pub fn top(&self) -> Option<&CategoryTotal> {
        let mut best: Option<&CategoryTotal> = None;
        for candidate in &self.categories {
            match best {
                Some(current) if candidate.total_amount <= current.total_amount => {}
                _ => best = Some(candidate),
            }
        }
        best
    }

    pub fn summary(&self) -> MonthlySummary {
        MonthlySummary {
            total_spent: self.grand_total,
            total_expenses: self.grand_count,
            avg_expense: if self.grand_count > 0 {
                self.grand_total / self.grand_count as f64
            } else {
                0.0
            },
        }
    }

    /// Categories ordered by total descending; equal totals keep name order
    pub fn breakdown(&self) -> Vec<CategorySpend> {
        let mut rows: Vec<CategorySpend> = self
            .categories
            .iter()
            .map(|c| CategorySpend {
                category: c.category.clone(),
                total_spent: c.total_amount,
            })
            .collect();
        // Stable sort over name-ordered input
        rows.sort_by(|a, b| {
            b.total_spent
                .partial_cmp(&a.total_spent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use chrono::{TimeZone, Utc};

    fn expense(category: &str, amount: f64) -> Expense {
        Expense {
            id: 0,
            owner_id: "alice".to_string(),
            amount,
            category: category.to_string(),
            description: None,
            payment_method: PaymentMethod::Cash,
            date: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
            auto_categorized: false,
            created_at: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_input() {
        let agg = aggregate(&[]);
        assert!(agg.categories.is_empty());
        assert_eq!(agg.grand_total, 0.0);
        assert_eq!(agg.grand_count, 0);
        assert!(agg.top().is_none());
        assert_eq!(agg.summary(), MonthlySummary::default());
    }

    #[test]
    fn test_groups_and_means() {
        let agg = aggregate(&[
            expense("Food", 100.0),
            expense("Travel", 40.0),
            expense("Food", 50.0),
        ]);

        assert_eq!(agg.categories.len(), 2);
        let food = &agg.categories[0];
        assert_eq!(food.category, "Food");
        assert_eq!(food.total_amount, 150.0);
        assert_eq!(food.count, 2);
        assert_eq!(food.mean, 75.0);
        assert_eq!(agg.grand_total, 190.0);
        assert_eq!(agg.grand_count, 3);
    }

    #[test]
    fn test_categories_are_case_sensitive() {
        let agg = aggregate(&[expense("food", 10.0), expense("Food", 20.0)]);
        assert_eq!(agg.categories.len(), 2);
        assert_eq!(agg.total_for("Food"), 20.0);
        assert_eq!(agg.total_for("food"), 10.0);
        assert_eq!(agg.total_for("FOOD"), 0.0);
    }

    #[test]
    fn test_conservation_with_awkward_floats() {
        let amounts = [0.1, 0.2, 0.3, 1e-3, 12345.678, 0.7, 99.99, 0.01];
        let categories = ["A", "B", "C"];
        let expenses: Vec<Expense> = amounts
            .iter()
            .enumerate()
            .map(|(i, a)| expense(categories[i % categories.len()], *a))
            .collect();

        let agg = aggregate(&expenses);
        let sum: f64 = agg.categories.iter().map(|c| c.total_amount).sum();
        assert_eq!(sum, agg.grand_total);
        assert_eq!(
            agg.categories.iter().map(|c| c.count).sum::<usize>(),
            agg.grand_count
        );
    }

    #[test]
    fn test_top_tie_goes_to_first_alphabetically() {
        let agg = aggregate(&[
            expense("Travel", 100.0),
            expense("Bills", 100.0),
            expense("Food", 50.0),
        ]);
        assert_eq!(agg.top().unwrap().category, "Bills");
    }

    #[test]
    fn test_breakdown_sorted_desc_with_stable_ties() {
        let agg = aggregate(&[
            expense("Rent", 500.0),
            expense("Food", 120.0),
            expense("Books", 120.0),
            expense("Travel", 800.0),
        ]);
        let breakdown = agg.breakdown();
        let names: Vec<&str> = breakdown.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Travel", "Rent", "Books", "Food"]);
    }

    #[test]
    fn test_summary_average() {
        let agg = aggregate(&[expense("Food", 30.0), expense("Food", 60.0)]);
        let summary = agg.summary();
        assert_eq!(summary.total_spent, 90.0);
        assert_eq!(summary.total_expenses, 2);
        assert_eq!(summary.avg_expense, 45.0);
    }
}
