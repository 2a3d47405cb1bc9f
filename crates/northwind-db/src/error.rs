//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      ValidationError (northwind-core)      │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (CLI) ← printed to stderr, non-zero exit                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use northwind_core::ValidationError;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Deleting a category id that does not exist
    /// - Any lookup that must find a row
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Deleting a category that products still reference
    /// - Inserting a product with a category id that does not exist
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The connection string was empty.
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist (and creation is off)
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema bootstrap failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    ///
    /// ## When This Occurs
    /// - SQL syntax error in a raw statement
    /// - CHECK constraint failure
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No connection became available in time.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A row failed validation before it was written.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Fills in the offending key of a `UniqueViolation`. SQLite only names
    /// the column, so inserts attach the value they tried to write.
    pub fn duplicate_of(self, value: impl ToString) -> Self {
        match self {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: value.to_string(),
            },
            other => other,
        }
    }

    /// True for the "row does not exist" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

/// `categories.id` out of `UNIQUE constraint failed: categories.id`.
fn failed_column(message: &str) -> String {
    message
        .rsplit_once(": ")
        .map_or(message, |(_, column)| column)
        .to_string()
}

/// Classifies statement errors by the SQLite extended result code.
///
/// ```text
/// SQLITE_CONSTRAINT_PRIMARYKEY / _UNIQUE  → UniqueViolation   (duplicate ids)
/// SQLITE_CONSTRAINT_FOREIGNKEY            → ForeignKeyViolation
///                                           (category still referenced,
///                                            unknown category/supplier id)
/// other database errors (CHECK, syntax)   → QueryFailed
/// decode and protocol errors              → Internal
/// ```
///
/// Acquire failures never get here: `Database::session` maps them itself.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        let sqlx::Error::Database(db_err) = &err else {
            return DbError::Internal(err.to_string());
        };

        match db_err.kind() {
            ErrorKind::UniqueViolation => DbError::UniqueViolation {
                field: failed_column(db_err.message()),
                value: String::new(),
            },
            ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                message: db_err.message().to_string(),
            },
            _ => DbError::QueryFailed(db_err.message().to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
