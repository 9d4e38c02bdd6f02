//! Storage layer for FinTrack
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. The transaction repository doubles as the report engine's
//! transaction source.

pub mod file_io;
pub mod transactions;

pub use file_io::{read_json, write_json_atomic};
pub use transactions::TransactionRepository;

use crate::config::paths::FintrackPaths;
use crate::error::FintrackError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FintrackPaths,
    pub transactions: TransactionRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: FintrackPaths) -> Result<Self, FintrackError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &FintrackPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), FintrackError> {
        self.transactions.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), FintrackError> {
        self.transactions.save()?;
        Ok(())
    }
}
