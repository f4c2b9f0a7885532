//! Custom error types for TallyCLI
//!
//! All library operations return [`TallyResult`]; the binary converts the
//! error into an `anyhow` report at the top level.

use thiserror::Error;

/// The main error type for TallyCLI operations
#[derive(Error, Debug)]
pub enum TallyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// The active user may not act on this record
    #[error("Permission denied: {0}")]
    Permission(String),

    /// Invalid shared-expense status transition
    #[error("Settlement error: {0}")]
    Settlement(String),

    /// Receipt upload or processing errors
    #[error("Receipt error: {0}")]
    Receipt(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// No active user profile
    #[error("No active user. Run 'tally user add <email>' or 'tally user switch <email>' first")]
    NotSignedIn,

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TallyError {
    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for receipts
    pub fn receipt_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Receipt",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for notifications
    pub fn notification_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Notification",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for TallyError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for TallyCLI operations
pub type TallyResult<T> = Result<T, TallyError>;
