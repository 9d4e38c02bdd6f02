//! FinTrack - Terminal-based personal finance tracker
//!
//! This library provides the core functionality for the FinTrack application:
//! a date-stamped stream of income/expense records is aggregated into a
//! single-period financial summary and a multi-month trend report with
//! per-category breakdowns and growth metrics.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, money, date windows, ids)
//! - `source`: The read-only transaction source seam reports are built on
//! - `storage`: JSON file storage layer (implements the source)
//! - `reports`: The aggregation engine (period summary, trend analysis)
//! - `display`: Terminal formatting
//! - `export`: CSV export
//! - `cli`: Command handlers

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod source;
pub mod storage;

pub use error::{FintrackError, FintrackResult};
