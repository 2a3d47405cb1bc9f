//! # Error Types
//!
//! Domain-specific error types for northwind-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  northwind-core errors (this file)                                     │
//! │  ├── CoreError        - Money parsing, wrapped validation              │
//! │  └── ValidationError  - Field rule failures                            │
//! │                                                                         │
//! │  northwind-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  northwind CLI errors (in app)                                         │
//! │  └── AppError         - What reaches `main`                            │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → AppError → stderr + exit code       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A money amount could not be parsed.
    ///
    /// ## When This Occurs
    /// - `--price abc` on the command line
    /// - More than two decimal places (`10.005`)
    #[error("Invalid money amount '{input}': {reason}")]
    InvalidMoney { input: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub(crate) fn invalid_money(input: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidMoney {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before a row is written, so the database never sees a negative
/// price or an empty category name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., a customer code that is not five letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
