//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the storage and report layers.

pub mod report;
pub mod transaction;

pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{FintrackError, FintrackResult};

/// Parse a YYYY-MM-DD date argument
pub(crate) fn parse_date(s: &str) -> FintrackResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        FintrackError::Validation(format!("Invalid date format: {}. Use YYYY-MM-DD", s))
    })
}
