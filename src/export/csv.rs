//! CSV export functionality
//!
//! Exports transactions to CSV format with proper field escaping.

use std::io::Write;

use crate::error::{FintrackError, FintrackResult};
use crate::models::Transaction;

/// Export transactions to CSV
pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: &mut W,
) -> FintrackResult<()> {
    // Write header
    writeln!(writer, "ID,Date,Kind,Category,Description,Amount")
        .map_err(|e| FintrackError::Export(e.to_string()))?;

    for txn in transactions {
        writeln!(
            writer,
            "{},{},{},{},{},{:.2}",
            txn.id,
            txn.date,
            txn.kind,
            escape_csv(&txn.category),
            escape_csv(&txn.description),
            txn.amount.cents() as f64 / 100.0,
        )
        .map_err(|e| FintrackError::Export(e.to_string()))?;
    }

    Ok(())
}

/// Escape a CSV field (quote if it contains comma, quote, or newline)
pub(crate) fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionKind, UserId};
    use chrono::NaiveDate;

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("Food"), "Food");
        assert_eq!(escape_csv("Food, Drink"), "\"Food, Drink\"");
        assert_eq!(escape_csv("He said \"hi\""), "\"He said \"\"hi\"\"\"");
    }

    #[test]
    fn test_export_transactions_csv() {
        let txn = Transaction::with_details(
            UserId::new(),
            TransactionKind::Expense,
            Money::from_cents(1250),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            "Food, Drink",
            "lunch",
        );

        let mut buf = Vec::new();
        export_transactions_csv(&[txn], &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "ID,Date,Kind,Category,Description,Amount");
        let row = lines.next().unwrap();
        assert!(row.contains("2025-01-15,expense,\"Food, Drink\",lunch,12.50"));
    }
}
