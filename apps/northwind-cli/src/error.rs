//! Error type for command execution.

use northwind_db::DbError;
use thiserror::Error;

use crate::config::ConfigError;

/// Anything a subcommand can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Db(#[from] DbError),

    /// stdout went away (closed pipe and the like).
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("{failed} of {total} demos failed")]
    DemosFailed { failed: usize, total: usize },
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_errors_display_unchanged() {
        let err: AppError = DbError::not_found("Category", 77).into();
        assert_eq!(err.to_string(), "Category not found: 77");
    }

    #[test]
    fn test_demos_failed_message() {
        let err = AppError::DemosFailed { failed: 2, total: 8 };
        assert_eq!(err.to_string(), "2 of 8 demos failed");
    }
}
