//! Transaction model
//!
//! Represents a single income or expense record. Direction is carried by the
//! kind, never by the sign of the amount: amounts are strictly positive.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{TransactionId, UserId};
use super::money::Money;

/// Category name used when a record has no explicit category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Classification of a transaction as income or expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (salary, refunds, ...)
    Income,
    /// Money going out (purchases, bills, ...)
    Expense,
}

impl TransactionKind {
    /// Check if this is an income record
    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }

    /// Check if this is an expense record
    pub fn is_expense(&self) -> bool {
        matches!(self, Self::Expense)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(KindParseError(other.to_string())),
        }
    }
}

/// Error type for kind parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindParseError(String);

impl fmt::Display for KindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid transaction kind: {} (expected income or expense)", self.0)
    }
}

impl std::error::Error for KindParseError {}

/// A financial transaction record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The user this record belongs to
    pub user_id: UserId,

    /// Income or expense
    pub kind: TransactionKind,

    /// Amount (always positive; direction comes from `kind`)
    pub amount: Money,

    /// The calendar date the transaction occurred on
    pub date: NaiveDate,

    /// Category name
    #[serde(default = "default_category")]
    pub category: String,

    /// Free-text description (not used in aggregation)
    #[serde(default)]
    pub description: String,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

fn default_category() -> String {
    UNCATEGORIZED.to_string()
}

impl Transaction {
    /// Create a new transaction
    pub fn new(user_id: UserId, kind: TransactionKind, amount: Money, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            user_id,
            kind,
            amount,
            date,
            category: default_category(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a transaction with all common fields
    pub fn with_details(
        user_id: UserId,
        kind: TransactionKind,
        amount: Money,
        date: NaiveDate,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let mut txn = Self::new(user_id, kind, amount, date);
        let category = category.into();
        if !category.trim().is_empty() {
            txn.category = category;
        }
        txn.description = description.into();
        txn
    }

    /// Check if this record counts toward income totals
    pub fn is_income(&self) -> bool {
        self.kind.is_income()
    }

    /// Check if this record counts toward expense totals
    pub fn is_expense(&self) -> bool {
        self.kind.is_expense()
    }

    /// Validate the transaction against a reference "today"
    pub fn validate(&self, today: NaiveDate) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if self.date > today {
            return Err(TransactionValidationError::FutureDate(self.date));
        }

        if self.description.len() > 500 {
            return Err(TransactionValidationError::DescriptionTooLong(
                self.description.len(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.category,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    FutureDate(NaiveDate),
    DescriptionTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be positive, got {}", amount)
            }
            Self::FutureDate(date) => {
                write!(f, "Date cannot be in the future: {}", date)
            }
            Self::DescriptionTooLong(len) => {
                write!(f, "Description is too long ({} chars, max 500)", len)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
