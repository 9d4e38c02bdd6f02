//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display.
//! Report types carry their own `format_terminal` methods; this module
//! handles transaction listings.

pub mod transaction;

pub use transaction::{format_transaction_register, format_transaction_row};
