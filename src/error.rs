//! Error types for the storage add-on validator
//!
//! Validation outcomes (success, failure, pending) are not errors; they are
//! returned as [`ValidationVerdict`](crate::feasibility::ValidationVerdict).
//! The types here cover the plumbing around them: configuration, inventory
//! decoding and file IO.

use thiserror::Error;

/// Unified error type for the validator
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Inventory Errors
    // =========================================================================
    #[error("Missing inventory for host {host}")]
    InventoryMissing { host: String },

    #[error("Failed to parse inventory of host {host}: {reason}")]
    InventoryParse { host: String, reason: String },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a caller should do after an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// The data may still arrive; validate again later
    RetryLater,
    /// Retrying with the same inputs gives the same answer
    NoRetry,
}

impl Error {
    /// Determine what action to take for this error
    pub fn action(&self) -> ErrorAction {
        match self {
            // Inventory is reported asynchronously by the host agent
            Error::InventoryMissing { .. } => ErrorAction::RetryLater,

            // A file may be mid-write or temporarily unreadable
            Error::Io(_) => ErrorAction::RetryLater,

            Error::Configuration(_)
            | Error::InventoryParse { .. }
            | Error::JsonParse(_)
            | Error::YamlParse(_) => ErrorAction::NoRetry,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self.action(), ErrorAction::RetryLater)
    }

    /// Check if this error is caused by host data that has not arrived yet
    pub fn is_missing_data(&self) -> bool {
        matches!(self, Error::InventoryMissing { .. })
    }
}

/// Result type alias for the validator
pub type Result<T> = std::result::Result<T, Error>;
