//! Date window representation
//!
//! An inclusive `[start, end]` calendar range over which transactions are
//! aggregated. Calendar-month windows are the unit the trend analyzer
//! iterates over.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::error::{FintrackError, FintrackResult};

/// An inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Create a window from explicit bounds
    ///
    /// Fails fast when `end` precedes `start`; the range is never clamped.
    pub fn new(start: NaiveDate, end: NaiveDate) -> FintrackResult<Self> {
        if end < start {
            return Err(FintrackError::InvalidArgument(format!(
                "end date {} precedes start date {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// The calendar-month window containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap());
        Self {
            start,
            end: last_day_of_month(date.year(), date.month()),
        }
    }

    /// The calendar month for an explicit year/month pair
    pub fn month(year: i32, month: u32) -> FintrackResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            FintrackError::InvalidArgument(format!("invalid month: {:04}-{:02}", year, month))
        })?;
        Ok(Self {
            start,
            end: last_day_of_month(year, month),
        })
    }

    /// Get the start date (inclusive)
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Get the end date (inclusive)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Check if a date falls within this window
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The calendar-month window immediately before the month containing `start`
    pub fn prev_month(&self) -> Self {
        let (year, month) = if self.start.month() == 1 {
            (self.start.year() - 1, 12)
        } else {
            (self.start.year(), self.start.month() - 1)
        };
        // Always a valid month, so month() cannot fail here
        Self {
            start: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            end: last_day_of_month(year, month),
        }
    }

    /// Full month label, e.g. "January 2025"
    pub fn month_label(&self) -> String {
        self.start.format("%B %Y").to_string()
    }

    /// Abbreviated month label, e.g. "Jan 25"
    pub fn month_label_short(&self) -> String {
        self.start.format("%b %y").to_string()
    }

    /// Parse a "YYYY-MM" month string into its calendar-month window
    pub fn parse_month(s: &str) -> Result<Self, WindowParseError> {
        let s = s.trim();
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 2 {
            return Err(WindowParseError::InvalidFormat(s.to_string()));
        }

        let year: i32 = parts[0]
            .parse()
            .map_err(|_| WindowParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = parts[1]
            .parse()
            .map_err(|_| WindowParseError::InvalidFormat(s.to_string()))?;

        if !(1..=12).contains(&month) {
            return Err(WindowParseError::InvalidMonth(month));
        }

        Self::month(year, month).map_err(|_| WindowParseError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

impl Ord for DateWindow {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.start.cmp(&other.start).then(self.end.cmp(&other.end))
    }
}

impl PartialOrd for DateWindow {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Last day of the given calendar month
fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month.unwrap() - Duration::days(1)
}

/// Error type for window parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for WindowParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowParseError::InvalidFormat(s) => write!(f, "Invalid month format: {}", s),
            WindowParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for WindowParseError {}
