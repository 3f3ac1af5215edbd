//! # Error Types
//!
//! Structured error types for quote_core. Lookups against the rate table never
//! produce errors (unknown keys fall back to documented defaults), so the
//! variants here cover caller contract violations, formatting failures and
//! file handling.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::errors::{QuoteError, QuoteResult};
//!
//! fn validate_area(area_m2: f64) -> QuoteResult<()> {
//!     if area_m2 <= 0.0 {
//!         return Err(QuoteError::InvalidInput {
//!             field: "area_m2".to_string(),
//!             value: area_m2.to_string(),
//!             reason: "Area must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for quote_core operations
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Structured error type for estimate and quote operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum QuoteError {
    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A computed monetary amount is NaN or infinite
    #[error("Non-finite amount for '{field}': {value}")]
    NonFiniteAmount { field: String, value: String },

    /// A formatted value could not be parsed back
    #[error("Formatting error: cannot parse '{input}' - {reason}")]
    Formatting { input: String, reason: String },

    /// A rate table failed validation and was not installed
    #[error("Invalid rate table: {entry} - {reason}")]
    InvalidRateTable { entry: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl QuoteError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        QuoteError::MissingField {
            field: field.into(),
        }
    }

    /// Create a NonFiniteAmount error
    pub fn non_finite(field: impl Into<String>, value: f64) -> Self {
        QuoteError::NonFiniteAmount {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Create a Formatting error
    pub fn formatting(input: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::Formatting {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidRateTable error
    pub fn invalid_rate_table(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::InvalidRateTable {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        QuoteError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        QuoteError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, QuoteError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteError::InvalidInput { .. } => "INVALID_INPUT",
            QuoteError::MissingField { .. } => "MISSING_FIELD",
            QuoteError::NonFiniteAmount { .. } => "NON_FINITE_AMOUNT",
            QuoteError::Formatting { .. } => "FORMATTING_ERROR",
            QuoteError::InvalidRateTable { .. } => "INVALID_RATE_TABLE",
            QuoteError::FileError { .. } => "FILE_ERROR",
            QuoteError::FileLocked { .. } => "FILE_LOCKED",
            QuoteError::SerializationError { .. } => "SERIALIZATION_ERROR",
            QuoteError::VersionMismatch { .. } => "VERSION_MISMATCH",
            QuoteError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
