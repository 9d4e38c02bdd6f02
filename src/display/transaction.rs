//! Transaction display formatting
//!
//! Provides utilities for formatting transactions for terminal display.

use crate::models::Transaction;

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction) -> String {
    let description = if txn.description.is_empty() {
        String::new()
    } else {
        truncate(&txn.description, 24)
    };

    format!(
        "{:<12} {} {:<8} {:<20} {:>12} {}",
        txn.id.to_string(),
        txn.date.format("%Y-%m-%d"),
        txn.kind.to_string(),
        truncate(&txn.category, 20),
        txn.amount.to_string(),
        description
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:<10} {:<8} {:<20} {:>12}\n",
        "ID", "Date", "Kind", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn));
        output.push('\n');
    }

    output
}

/// Truncate a string to a maximum length, adding an ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
