//! Core data models for FinTrack
//!
//! This module contains all the data structures that represent the tracking
//! domain: transactions, monetary amounts, date windows, and typed ids.

pub mod ids;
pub mod money;
pub mod transaction;
pub mod window;

pub use ids::{TransactionId, UserId};
pub use money::Money;
pub use transaction::{Transaction, TransactionKind, UNCATEGORIZED};
pub use window::DateWindow;
