//! Reports module for FinTrack
//!
//! Provides the financial aggregation engine: single-window period summaries
//! and multi-month trend reports, plus the shared rounding and ratio helpers
//! both report types use.

pub mod summary;
pub mod trends;

pub use summary::{AverageTransaction, CategoryTotal, PeriodSummary, TransactionCount};
pub use trends::{
    CategoryTrend, GrowthRates, MonthlyTrend, TrendAverages, TrendPoint, TrendReport,
};

use crate::models::Money;

/// Round to two decimal places, half away from zero
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part` as a percentage of `whole`, rounded to two decimals
///
/// Zero when `whole` is zero: a policy choice, not a derived limit.
pub(crate) fn ratio_percent(part: Money, whole: Money) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    round2(part.cents() as f64 / whole.cents() as f64 * 100.0)
}

/// Percentage change from `start` to `end`, rounded to two decimals
///
/// Zero when `start` is zero: a policy choice, not a derived limit.
pub(crate) fn percent_change(start: Money, end: Money) -> f64 {
    if start.is_zero() {
        return 0.0;
    }
    round2((end - start).cents() as f64 / start.cents() as f64 * 100.0)
}

/// Sort category totals by amount descending, then category name ascending
///
/// The name key keeps breakdowns and top-N cuts deterministic when two
/// categories sum to the same amount.
pub(crate) fn sort_category_totals(totals: &mut [(String, Money)]) {
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(62.499), 62.5);
        assert_eq!(round2(166.66666), 166.67);
        assert_eq!(round2(-0.005), -0.01);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_ratio_percent() {
        assert_eq!(
            ratio_percent(Money::from_units(5000), Money::from_units(8000)),
            62.5
        );
        // zero denominator is a defined zero, never a division
        assert_eq!(ratio_percent(Money::from_units(-300), Money::zero()), 0.0);
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(
            percent_change(Money::from_units(3000), Money::from_units(8000)),
            166.67
        );
        assert_eq!(
            percent_change(Money::from_units(1000), Money::from_units(500)),
            -50.0
        );
        assert_eq!(percent_change(Money::zero(), Money::from_units(500)), 0.0);
    }

    #[test]
    fn test_sort_category_totals_ties_break_by_name() {
        let mut totals = vec![
            ("Transport".to_string(), Money::from_units(100)),
            ("Food".to_string(), Money::from_units(250)),
            ("Bills".to_string(), Money::from_units(100)),
        ];
        sort_category_totals(&mut totals);
        let names: Vec<&str> = totals.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Food", "Bills", "Transport"]);
    }
}
