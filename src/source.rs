//! Transaction source seam
//!
//! Reports are pure functions over data supplied by a [`TransactionSource`].
//! The storage layer implements this trait; tests can implement it over
//! fixtures. Sources are read-only and already user-scoped: authorization
//! happens before the engine is invoked.

use crate::error::FintrackResult;
use crate::models::{DateWindow, Money, Transaction, TransactionKind, UserId};

/// Read-only supplier of transaction records for report generation
///
/// Failures surface unchanged to the report caller; the engine performs no
/// retries of its own.
pub trait TransactionSource {
    /// Fetch the records for a user within a window, optionally restricted to
    /// one kind, in the source's ordering
    fn fetch(
        &self,
        user_id: UserId,
        kind: Option<TransactionKind>,
        window: DateWindow,
    ) -> FintrackResult<Vec<Transaction>>;

    /// Sum amounts per category for one kind within a window
    ///
    /// Pairs are returned in the order categories are first encountered by
    /// the source; callers impose their own sort.
    fn sum_by_category(
        &self,
        user_id: UserId,
        kind: TransactionKind,
        window: DateWindow,
    ) -> FintrackResult<Vec<(String, Money)>>;
}
