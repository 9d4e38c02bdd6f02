//! Export functionality for FinTrack
//!
//! Exports transaction data to CSV format.

pub mod csv;

pub use csv::export_transactions_csv;
