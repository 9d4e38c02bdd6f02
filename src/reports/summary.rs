//! Period summary report
//!
//! Aggregates one user's transactions over a single date window into totals,
//! category breakdowns, counts, and averages.

use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

use crate::error::{FintrackError, FintrackResult};
use crate::export::csv::escape_csv;
use crate::models::{DateWindow, Money, UserId};
use crate::source::TransactionSource;

use super::{ratio_percent, sort_category_totals};

/// Default number of entries returned by top-category cuts
pub const TOP_CATEGORY_LIMIT: usize = 5;

/// A category name with its summed amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category name
    pub category: String,
    /// Summed amount for the category
    pub amount: Money,
}

/// Record counts per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransactionCount {
    /// Number of income records
    pub income: usize,
    /// Number of expense records
    pub expense: usize,
    /// Total number of records
    pub total: usize,
}

/// Per-kind average record amount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AverageTransaction {
    /// Average income record, zero when there are no income records
    pub income: Money,
    /// Average expense record, zero when there are no expense records
    pub expense: Money,
}

/// Financial summary for one date window
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    /// The window the summary covers
    pub window: DateWindow,
    /// Sum of income amounts
    pub total_income: Money,
    /// Sum of expense amounts
    pub total_expenses: Money,
    /// Income minus expenses (may be negative)
    pub net_savings: Money,
    /// Net savings as a percentage of income, zero when income is zero
    pub savings_rate: f64,
    /// Income per category, amount descending then name ascending
    pub income_by_category: Vec<CategoryTotal>,
    /// Expenses per category, amount descending then name ascending
    pub expenses_by_category: Vec<CategoryTotal>,
    /// Record counts per kind
    pub transaction_count: TransactionCount,
    /// Per-kind averages, rounded to whole cents
    pub average_transaction: AverageTransaction,
}

impl PeriodSummary {
    /// Generate a summary for a user's transactions within a window
    ///
    /// An empty window is a normal input and yields an all-zero summary;
    /// only source failures surface as errors.
    pub fn generate(
        source: &impl TransactionSource,
        user_id: UserId,
        window: DateWindow,
    ) -> FintrackResult<Self> {
        let transactions = source.fetch(user_id, None, window)?;

        let mut total_income = Money::zero();
        let mut total_expenses = Money::zero();
        let mut income_count = 0usize;
        let mut expense_count = 0usize;
        let mut income_by_category: HashMap<String, Money> = HashMap::new();
        let mut expenses_by_category: HashMap<String, Money> = HashMap::new();

        for txn in &transactions {
            if txn.is_income() {
                total_income += txn.amount;
                income_count += 1;
                *income_by_category
                    .entry(txn.category.clone())
                    .or_insert_with(Money::zero) += txn.amount;
            } else {
                total_expenses += txn.amount;
                expense_count += 1;
                *expenses_by_category
                    .entry(txn.category.clone())
                    .or_insert_with(Money::zero) += txn.amount;
            }
        }

        let net_savings = total_income - total_expenses;

        Ok(Self {
            window,
            total_income,
            total_expenses,
            net_savings,
            savings_rate: ratio_percent(net_savings, total_income),
            income_by_category: sorted_totals(income_by_category),
            expenses_by_category: sorted_totals(expenses_by_category),
            transaction_count: TransactionCount {
                income: income_count,
                expense: expense_count,
                total: income_count + expense_count,
            },
            average_transaction: AverageTransaction {
                income: average(total_income, income_count),
                expense: average(total_expenses, expense_count),
            },
        })
    }

    /// The first `limit` expense categories after sorting
    pub fn top_expense_categories(&self, limit: usize) -> &[CategoryTotal] {
        &self.expenses_by_category[..limit.min(self.expenses_by_category.len())]
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Period Summary: {} to {}\n",
            self.window.start(),
            self.window.end()
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Total Income:    {:>14}\n", self.total_income.to_string()));
        output.push_str(&format!(
            "Total Expenses:  {:>14}\n",
            self.total_expenses.to_string()
        ));
        output.push_str(&format!("Net Savings:     {:>14}\n", self.net_savings.to_string()));
        output.push_str(&format!("Savings Rate:    {:>13.2}%\n", self.savings_rate));
        output.push_str(&format!(
            "Transactions:    {} total ({} income, {} expense)\n",
            self.transaction_count.total,
            self.transaction_count.income,
            self.transaction_count.expense
        ));
        output.push_str(&format!(
            "Average:         income {}, expense {}\n",
            self.average_transaction.income, self.average_transaction.expense
        ));

        if !self.income_by_category.is_empty() {
            output.push_str("\nIncome by Category\n");
            for entry in &self.income_by_category {
                output.push_str(&format!(
                    "  {:<30} {:>14}\n",
                    entry.category,
                    entry.amount.to_string()
                ));
            }
        }

        if !self.expenses_by_category.is_empty() {
            output.push_str("\nExpenses by Category\n");
            for entry in &self.expenses_by_category {
                output.push_str(&format!(
                    "  {:<30} {:>14}\n",
                    entry.category,
                    entry.amount.to_string()
                ));
            }
        }

        output
    }

    /// Export the summary to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> FintrackResult<()> {
        writeln!(writer, "Start Date,End Date,Kind,Category,Amount")
            .map_err(|e| FintrackError::Export(e.to_string()))?;

        for (kind, entries) in [
            ("income", &self.income_by_category),
            ("expense", &self.expenses_by_category),
        ] {
            for entry in entries {
                writeln!(
                    writer,
                    "{},{},{},{},{:.2}",
                    self.window.start(),
                    self.window.end(),
                    kind,
                    escape_csv(&entry.category),
                    entry.amount.cents() as f64 / 100.0,
                )
                .map_err(|e| FintrackError::Export(e.to_string()))?;
            }
        }

        for (label, amount) in [
            ("Income", self.total_income),
            ("Expenses", self.total_expenses),
            ("Net Savings", self.net_savings),
        ] {
            writeln!(
                writer,
                "{},{},total,{},{:.2}",
                self.window.start(),
                self.window.end(),
                label,
                amount.cents() as f64 / 100.0,
            )
            .map_err(|e| FintrackError::Export(e.to_string()))?;
        }

        Ok(())
    }
}

/// Collect a grouped sum into the sorted category vector
fn sorted_totals(grouped: HashMap<String, Money>) -> Vec<CategoryTotal> {
    let mut totals: Vec<(String, Money)> = grouped.into_iter().collect();
    sort_category_totals(&mut totals);
    totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal { category, amount })
        .collect()
}

/// Average amount per record, zero when the count is zero
fn average(total: Money, count: usize) -> Money {
    if count == 0 {
        Money::zero()
    } else {
        total.div_round(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{Transaction, TransactionKind};
    use crate::storage::Storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> DateWindow {
        DateWindow::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap()
    }

    fn add(
        storage: &Storage,
        user_id: UserId,
        kind: TransactionKind,
        units: i64,
        category: &str,
        on: NaiveDate,
    ) {
        let txn = Transaction::with_details(
            user_id,
            kind,
            Money::from_units(units),
            on,
            category,
            "",
        );
        storage.transactions.upsert(txn).unwrap();
    }

    #[test]
    fn test_empty_window_yields_zeroed_summary() {
        let (_temp_dir, storage) = create_test_storage();
        let user_id = UserId::new();

        let summary = PeriodSummary::generate(&storage.transactions, user_id, january()).unwrap();

        assert_eq!(summary.total_income, Money::zero());
        assert_eq!(summary.total_expenses, Money::zero());
        assert_eq!(summary.net_savings, Money::zero());
        assert_eq!(summary.savings_rate, 0.0);
        assert!(summary.income_by_category.is_empty());
        assert!(summary.expenses_by_category.is_empty());
        assert_eq!(
            summary.transaction_count,
            TransactionCount {
                income: 0,
                expense: 0,
                total: 0
            }
        );
        assert_eq!(summary.average_transaction, AverageTransaction::default());
    }

    #[test]
    fn test_summary_totals_and_breakdowns() {
        let (_temp_dir, storage) = create_test_storage();
        let user_id = UserId::new();

        add(&storage, user_id, TransactionKind::Income, 5000, "Salary", date(2025, 1, 1));
        add(&storage, user_id, TransactionKind::Income, 3000, "Salary", date(2025, 1, 15));
        add(&storage, user_id, TransactionKind::Expense, 1500, "Food", date(2025, 1, 10));
        add(&storage, user_id, TransactionKind::Expense, 1000, "Food", date(2025, 1, 20));
        add(&storage, user_id, TransactionKind::Expense, 500, "Transport", date(2025, 1, 25));

        let summary = PeriodSummary::generate(&storage.transactions, user_id, january()).unwrap();

        assert_eq!(summary.total_income, Money::from_units(8000));
        assert_eq!(summary.total_expenses, Money::from_units(3000));
        assert_eq!(summary.net_savings, Money::from_units(5000));
        assert_eq!(summary.savings_rate, 62.5);

        assert_eq!(
            summary.income_by_category,
            vec![CategoryTotal {
                category: "Salary".to_string(),
                amount: Money::from_units(8000)
            }]
        );
        assert_eq!(
            summary.expenses_by_category,
            vec![
                CategoryTotal {
                    category: "Food".to_string(),
                    amount: Money::from_units(2500)
                },
                CategoryTotal {
                    category: "Transport".to_string(),
                    amount: Money::from_units(500)
                },
            ]
        );

        assert_eq!(
            summary.transaction_count,
            TransactionCount {
                income: 2,
                expense: 3,
                total: 5
            }
        );
        assert_eq!(summary.average_transaction.income, Money::from_units(4000));
        assert_eq!(summary.average_transaction.expense, Money::from_units(1000));
    }

    #[test]
    fn test_savings_rate_zero_when_no_income() {
        let (_temp_dir, storage) = create_test_storage();
        let user_id = UserId::new();

        add(&storage, user_id, TransactionKind::Expense, 750, "Food", date(2025, 1, 10));

        let summary = PeriodSummary::generate(&storage.transactions, user_id, january()).unwrap();

        assert_eq!(summary.net_savings, Money::from_units(-750));
        assert_eq!(summary.savings_rate, 0.0);
    }

    #[test]
    fn test_category_breakdown_sums_to_total() {
        let (_temp_dir, storage) = create_test_storage();
        let user_id = UserId::new();

        add(&storage, user_id, TransactionKind::Income, 1200, "Salary", date(2025, 1, 2));
        add(&storage, user_id, TransactionKind::Income, 87, "Interest", date(2025, 1, 9));
        add(&storage, user_id, TransactionKind::Income, 350, "Freelance", date(2025, 1, 23));

        let summary = PeriodSummary::generate(&storage.transactions, user_id, january()).unwrap();

        let breakdown_sum: Money = summary
            .income_by_category
            .iter()
            .map(|c| c.amount)
            .sum();
        assert_eq!(breakdown_sum, summary.total_income);
    }

    #[test]
    fn test_top_expense_categories_limit_and_order() {
        let (_temp_dir, storage) = create_test_storage();
        let user_id = UserId::new();

        for (i, name) in ["Rent", "Food", "Transport", "Fun", "Bills", "Gifts", "Misc"]
            .iter()
            .enumerate()
        {
            add(
                &storage,
                user_id,
                TransactionKind::Expense,
                (i as i64 + 1) * 100,
                name,
                date(2025, 1, 5),
            );
        }

        let summary = PeriodSummary::generate(&storage.transactions, user_id, january()).unwrap();

        let top = summary.top_expense_categories(TOP_CATEGORY_LIMIT);
        assert_eq!(top.len(), 5);
        for pair in top.windows(2) {
            assert!(pair[0].amount >= pair[1].amount);
        }
        assert_eq!(top[0].category, "Misc");

        // limit above the distinct category count is capped
        assert_eq!(summary.top_expense_categories(50).len(), 7);
    }

    #[test]
    fn test_category_ties_sorted_by_name() {
        let (_temp_dir, storage) = create_test_storage();
        let user_id = UserId::new();

        add(&storage, user_id, TransactionKind::Expense, 100, "Transport", date(2025, 1, 3));
        add(&storage, user_id, TransactionKind::Expense, 100, "Bills", date(2025, 1, 4));
        add(&storage, user_id, TransactionKind::Expense, 100, "Food", date(2025, 1, 5));

        let summary = PeriodSummary::generate(&storage.transactions, user_id, january()).unwrap();

        let names: Vec<&str> = summary
            .expenses_by_category
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(names, vec!["Bills", "Food", "Transport"]);
    }

    #[test]
    fn test_window_and_user_scoping() {
        let (_temp_dir, storage) = create_test_storage();
        let user_id = UserId::new();
        let other_user = UserId::new();

        add(&storage, user_id, TransactionKind::Income, 100, "Salary", date(2025, 1, 15));
        // outside the window
        add(&storage, user_id, TransactionKind::Income, 900, "Salary", date(2025, 2, 1));
        add(&storage, user_id, TransactionKind::Income, 900, "Salary", date(2024, 12, 31));
        // someone else's record
        add(&storage, other_user, TransactionKind::Income, 900, "Salary", date(2025, 1, 15));

        let summary = PeriodSummary::generate(&storage.transactions, user_id, january()).unwrap();

        assert_eq!(summary.total_income, Money::from_units(100));
        assert_eq!(summary.transaction_count.income, 1);
    }

    #[test]
    fn test_average_rounds_half_away_from_zero() {
        let (_temp_dir, storage) = create_test_storage();
        let user_id = UserId::new();

        // 100 + 100 + 101 cents averages to 100.33 cents, rounding to 100
        for cents in [100, 100, 101] {
            let txn = Transaction::with_details(
                user_id,
                TransactionKind::Expense,
                Money::from_cents(cents),
                date(2025, 1, 10),
                "Food",
                "",
            );
            storage.transactions.upsert(txn).unwrap();
        }

        let summary = PeriodSummary::generate(&storage.transactions, user_id, january()).unwrap();
        assert_eq!(summary.average_transaction.expense, Money::from_cents(100));
    }

    #[test]
    fn test_format_terminal_lists_breakdowns() {
        let (_temp_dir, storage) = create_test_storage();
        let user_id = UserId::new();

        add(&storage, user_id, TransactionKind::Income, 5000, "Salary", date(2025, 1, 1));
        add(&storage, user_id, TransactionKind::Expense, 1500, "Food", date(2025, 1, 10));

        let summary = PeriodSummary::generate(&storage.transactions, user_id, january()).unwrap();
        let text = summary.format_terminal();

        assert!(text.contains("Period Summary: 2025-01-01 to 2025-01-31"));
        assert!(text.contains("Total Income:"));
        assert!(text.contains("$5000.00"));
        assert!(text.contains("Salary"));
        assert!(text.contains("Food"));
    }

    #[test]
    fn test_export_csv_rows() {
        let (_temp_dir, storage) = create_test_storage();
        let user_id = UserId::new();

        add(&storage, user_id, TransactionKind::Income, 5000, "Salary", date(2025, 1, 1));
        add(&storage, user_id, TransactionKind::Expense, 1500, "Food", date(2025, 1, 10));

        let summary = PeriodSummary::generate(&storage.transactions, user_id, january()).unwrap();

        let mut buf = Vec::new();
        summary.export_csv(&mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();

        assert!(csv.starts_with("Start Date,End Date,Kind,Category,Amount\n"));
        assert!(csv.contains("2025-01-01,2025-01-31,income,Salary,5000.00"));
        assert!(csv.contains("2025-01-01,2025-01-31,expense,Food,1500.00"));
        assert!(csv.contains("2025-01-01,2025-01-31,total,Net Savings,3500.00"));
    }

    #[test]
    fn test_serializes_to_json() {
        let (_temp_dir, storage) = create_test_storage();
        let user_id = UserId::new();

        add(&storage, user_id, TransactionKind::Income, 100, "Salary", date(2025, 1, 15));

        let summary = PeriodSummary::generate(&storage.transactions, user_id, january()).unwrap();
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["total_income"], 10000);
        assert_eq!(json["savings_rate"], 100.0);
        assert_eq!(json["income_by_category"][0]["category"], "Salary");
    }
}
