//! Multi-month trend report
//!
//! Walks consecutive calendar months backward from an explicit as-of date,
//! summarizes each, and derives cross-period series, per-category series,
//! averages, and growth rates. The as-of date is injected so the analyzer is
//! deterministic and testable without a clock.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use tracing::debug;

use crate::error::{FintrackError, FintrackResult};
use crate::export::csv::escape_csv;
use crate::models::{DateWindow, Money, TransactionKind, UserId};
use crate::source::TransactionSource;

use super::summary::TOP_CATEGORY_LIMIT;
use super::{percent_change, sort_category_totals};

/// One month's aggregate row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    /// Full month label, e.g. "January 2025"
    pub month: String,
    /// Abbreviated month label, e.g. "Jan 25"
    pub month_short: String,
    /// First day of the month window
    pub date: NaiveDate,
    /// Income total for the month
    pub income: Money,
    /// Expense total for the month
    pub expenses: Money,
    /// Income minus expenses
    pub net: Money,
}

/// A labelled point in a trend series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// Abbreviated month label
    pub label: String,
    /// Value at that month
    pub amount: Money,
}

/// Per-month series for a single expense category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTrend {
    /// Category name
    pub name: String,
    /// Monthly totals, oldest to newest
    pub data: Vec<TrendPoint>,
}

/// Unweighted means across the monthly rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrendAverages {
    /// Mean monthly income
    pub monthly_income: Money,
    /// Mean monthly expenses
    pub monthly_expenses: Money,
    /// Mean monthly net savings
    pub monthly_savings: Money,
}

/// Percentage change between the oldest and newest monthly rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthRates {
    /// Income growth, zero when the oldest month's income is zero
    pub income: f64,
    /// Expense growth, zero when the oldest month's expenses are zero
    pub expenses: f64,
    /// Net savings growth, zero when the oldest month's net is zero
    pub savings: f64,
}

/// Trend analysis across consecutive calendar months
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    /// Per-month rows, oldest to newest
    pub monthly_trends: Vec<MonthlyTrend>,
    /// Income series, oldest to newest
    pub income_trend: Vec<TrendPoint>,
    /// Expense series, oldest to newest
    pub expense_trend: Vec<TrendPoint>,
    /// Net savings series, oldest to newest
    pub savings_trend: Vec<TrendPoint>,
    /// Series for the top expense categories across the whole span
    pub category_trends: Vec<CategoryTrend>,
    /// Unweighted monthly means
    pub averages: TrendAverages,
    /// Absent (not zeroed) when fewer than two monthly rows exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_rates: Option<GrowthRates>,
}

impl TrendReport {
    /// Generate a trend report over the `months` calendar months ending at
    /// the month containing `as_of`
    ///
    /// `months` must be at least 1; a zero value is a caller contract
    /// violation and fails fast.
    pub fn generate(
        source: &impl TransactionSource,
        user_id: UserId,
        months: u32,
        as_of: NaiveDate,
    ) -> FintrackResult<Self> {
        if months == 0 {
            return Err(FintrackError::InvalidArgument(
                "months must be at least 1".into(),
            ));
        }

        debug!(%user_id, months, %as_of, "generating trend report");

        // Walk month windows newest-first, then flip to oldest-first. Each
        // month is fetched once; the per-window records feed the trend row,
        // the derived series, and the category series below.
        let newest = DateWindow::month_of(as_of);
        let mut window = newest;
        let mut rows: Vec<MonthlyTrend> = Vec::with_capacity(months as usize);
        let mut expense_maps: Vec<HashMap<String, Money>> = Vec::with_capacity(months as usize);

        for _ in 0..months {
            let transactions = source.fetch(user_id, None, window)?;

            let mut income = Money::zero();
            let mut expenses = Money::zero();
            let mut by_category: HashMap<String, Money> = HashMap::new();

            for txn in &transactions {
                if txn.is_income() {
                    income += txn.amount;
                } else {
                    expenses += txn.amount;
                    *by_category
                        .entry(txn.category.clone())
                        .or_insert_with(Money::zero) += txn.amount;
                }
            }

            rows.push(MonthlyTrend {
                month: window.month_label(),
                month_short: window.month_label_short(),
                date: window.start(),
                income,
                expenses,
                net: income - expenses,
            });
            expense_maps.push(by_category);

            window = window.prev_month();
        }

        rows.reverse();
        expense_maps.reverse();

        let span = DateWindow::new(rows[0].date, newest.end())?;
        let category_trends =
            top_category_trends(source, user_id, span, &rows, &expense_maps)?;

        let growth_rates = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) if rows.len() >= 2 => Some(GrowthRates {
                income: percent_change(first.income, last.income),
                expenses: percent_change(first.expenses, last.expenses),
                savings: percent_change(first.net, last.net),
            }),
            _ => None,
        };

        Ok(Self {
            income_trend: series(&rows, |r| r.income),
            expense_trend: series(&rows, |r| r.expenses),
            savings_trend: series(&rows, |r| r.net),
            category_trends,
            averages: averages(&rows),
            growth_rates,
            monthly_trends: rows,
        })
    }

    /// Format the trend report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Trend Report ({} months)\n",
            self.monthly_trends.len()
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:>13} {:>13} {:>13}\n",
            "Month", "Income", "Expenses", "Net"
        ));

        for row in &self.monthly_trends {
            output.push_str(&format!(
                "{:<16} {:>13} {:>13} {:>13}\n",
                row.month,
                row.income.to_string(),
                row.expenses.to_string(),
                row.net.to_string()
            ));
        }

        output.push_str(&format!(
            "{:<16} {:>13} {:>13} {:>13}\n",
            "Average",
            self.averages.monthly_income.to_string(),
            self.averages.monthly_expenses.to_string(),
            self.averages.monthly_savings.to_string()
        ));

        if let Some(growth) = &self.growth_rates {
            output.push_str(&format!(
                "\nGrowth: income {:.2}%, expenses {:.2}%, savings {:.2}%\n",
                growth.income, growth.expenses, growth.savings
            ));
        }

        if !self.category_trends.is_empty() {
            output.push_str("\nTop Expense Categories\n");
            let mut header = format!("  {:<16}", "");
            for row in &self.monthly_trends {
                header.push_str(&format!(" {:>9}", row.month_short));
            }
            output.push_str(&header);
            output.push('\n');

            for category in &self.category_trends {
                let mut line = format!("  {:<16}", category.name);
                for point in &category.data {
                    line.push_str(&format!(" {:>9.2}", point.amount.cents() as f64 / 100.0));
                }
                output.push_str(&line);
                output.push('\n');
            }
        }

        output
    }

    /// Export the trend report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> FintrackResult<()> {
        writeln!(writer, "Month,Start Date,Income,Expenses,Net")
            .map_err(|e| FintrackError::Export(e.to_string()))?;

        for row in &self.monthly_trends {
            writeln!(
                writer,
                "{},{},{:.2},{:.2},{:.2}",
                escape_csv(&row.month),
                row.date,
                row.income.cents() as f64 / 100.0,
                row.expenses.cents() as f64 / 100.0,
                row.net.cents() as f64 / 100.0,
            )
            .map_err(|e| FintrackError::Export(e.to_string()))?;
        }

        writeln!(
            writer,
            "Average,,{:.2},{:.2},{:.2}",
            self.averages.monthly_income.cents() as f64 / 100.0,
            self.averages.monthly_expenses.cents() as f64 / 100.0,
            self.averages.monthly_savings.cents() as f64 / 100.0,
        )
        .map_err(|e| FintrackError::Export(e.to_string()))?;

        if let Some(growth) = &self.growth_rates {
            writeln!(
                writer,
                "Growth %,,{:.2},{:.2},{:.2}",
                growth.income, growth.expenses, growth.savings
            )
            .map_err(|e| FintrackError::Export(e.to_string()))?;
        }

        Ok(())
    }
}

/// Project one field of the monthly rows into a labelled series
fn series(rows: &[MonthlyTrend], value: impl Fn(&MonthlyTrend) -> Money) -> Vec<TrendPoint> {
    rows.iter()
        .map(|row| TrendPoint {
            label: row.month_short.clone(),
            amount: value(row),
        })
        .collect()
}

/// Pick the top expense categories across the span and build their series
/// from the already-fetched per-month sums
fn top_category_trends(
    source: &impl TransactionSource,
    user_id: UserId,
    span: DateWindow,
    rows: &[MonthlyTrend],
    expense_maps: &[HashMap<String, Money>],
) -> FintrackResult<Vec<CategoryTrend>> {
    let mut totals = source.sum_by_category(user_id, TransactionKind::Expense, span)?;
    sort_category_totals(&mut totals);

    Ok(totals
        .into_iter()
        .take(TOP_CATEGORY_LIMIT)
        .map(|(name, _)| CategoryTrend {
            data: rows
                .iter()
                .zip(expense_maps)
                .map(|(row, month)| TrendPoint {
                    label: row.month_short.clone(),
                    amount: month.get(&name).copied().unwrap_or_default(),
                })
                .collect(),
            name,
        })
        .collect())
}

/// Unweighted means of the monthly rows, zeroed for an empty set
fn averages(rows: &[MonthlyTrend]) -> TrendAverages {
    if rows.is_empty() {
        return TrendAverages::default();
    }
    let n = rows.len() as i64;
    TrendAverages {
        monthly_income: rows.iter().map(|r| r.income).sum::<Money>().div_round(n),
        monthly_expenses: rows.iter().map(|r| r.expenses).sum::<Money>().div_round(n),
        monthly_savings: rows.iter().map(|r| r.net).sum::<Money>().div_round(n),
    }
}
