//! Yearly totals built from the twelve monthly totals of the backend.

use std::collections::BTreeMap;

use crate::api::MonthTotals;

/// How many categories each ranking shows.
pub const TOP_CATEGORY_COUNT: usize = 5;

/// The revenue and expenses of each month of a year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearSummary {
    pub year: i32,
    /// Revenue per month, January first.
    pub revenue: [f64; 12],
    /// Expenses per month, January first.
    pub expenses: [f64; 12],
    /// Expenses per category summed over the year.
    pub expenses_by_category: BTreeMap<String, f64>,
    /// Revenue per category summed over the year.
    pub revenue_by_category: BTreeMap<String, f64>,
}

impl YearSummary {
    /// Combine the totals of each month, January first.
    ///
    /// Months past the twelfth are ignored.
    pub fn from_months(year: i32, months: &[MonthTotals]) -> Self {
        let mut summary = Self {
            year,
            ..Default::default()
        };

        for (index, totals) in months.iter().take(12).enumerate() {
            summary.revenue[index] = totals.revenue;
            summary.expenses[index] = totals.expenses;

            for (category, value) in &totals.expenses_by_category {
                *summary
                    .expenses_by_category
                    .entry(category.clone())
                    .or_insert(0.0) += value;
            }
        }

        summary
    }

    /// Add one month of revenue per category to the yearly sums.
    pub fn add_revenue(&mut self, by_category: BTreeMap<String, f64>) {
        for (category, value) in by_category {
            *self.revenue_by_category.entry(category).or_insert(0.0) += value;
        }
    }

    pub fn total_revenue(&self) -> f64 {
        self.revenue.iter().sum()
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses.iter().sum()
    }

    pub fn profit(&self) -> f64 {
        self.total_revenue() - self.total_expenses()
    }

    /// Revenue minus expenses for each month.
    pub fn monthly_profit(&self) -> [f64; 12] {
        std::array::from_fn(|index| self.revenue[index] - self.expenses[index])
    }
}

/// The change from `previous` to `current` in percent.
///
/// Returns `None` when `previous` is zero. The sign follows `previous`, so
/// going from a loss to a smaller loss is a negative change.
pub fn variation(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }

    Some((current - previous) / previous * 100.0)
}

/// The `count` largest categories, largest first, leaving out empty ones.
pub fn top_categories(by_category: &BTreeMap<String, f64>, count: usize) -> Vec<(&str, f64)> {
    let mut ranking = by_category
        .iter()
        .filter(|(_, value)| **value > 0.0)
        .map(|(category, value)| (category.as_str(), *value))
        .collect::<Vec<_>>();

    ranking.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    ranking.truncate(count);

    ranking
}
