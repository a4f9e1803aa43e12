//! Repository Module
//!
//! Free async functions over a SQLite executor (`&SqlitePool` or
//! `&mut *tx`), one module per table.

pub mod category;
pub mod dining_table;
pub mod dish;
pub mod event;
pub mod order;
pub mod staff_session;
pub mod system_config;
pub mod table_bill;
pub mod tax_config;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::retry::Transient;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Database locked/busy or pool exhausted; may succeed on retry
    #[error("Database busy: {0}")]
    Busy(String),
}

/// SQLITE_BUSY / SQLITE_LOCKED primary result codes
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => RepoError::Busy(err.to_string()),
            sqlx::Error::Database(db) => {
                if db.is_unique_violation() {
                    return RepoError::Duplicate(db.message().to_string());
                }
                let primary = db
                    .code()
                    .and_then(|c| c.parse::<i32>().ok())
                    .map(|c| c & 0xff);
                if matches!(primary, Some(SQLITE_BUSY | SQLITE_LOCKED)) {
                    RepoError::Busy(db.message().to_string())
                } else {
                    RepoError::Database(db.message().to_string())
                }
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Database(format!("JSON column error: {err}"))
    }
}

impl Transient for RepoError {
    fn is_transient(&self) -> bool {
        matches!(self, RepoError::Busy(_))
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Busy(msg) => AppError::with_message(ErrorCode::SystemBusy, msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: RepoError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, RepoError::NotFound(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_pool_timeout_is_transient() {
        let err: RepoError = sqlx::Error::PoolTimedOut.into();
        assert!(err.is_transient());
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::SystemBusy);
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let app: AppError = RepoError::Duplicate("Table 'T5' already exists".into()).into();
        assert_eq!(app.code, ErrorCode::AlreadyExists);
        assert_eq!(app.http_status(), http::StatusCode::CONFLICT);
    }
}
