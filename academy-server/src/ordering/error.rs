//! Ordering error taxonomy

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use super::{Collection, Scope};

/// Errors raised by the engine and the stores it drives
#[derive(Debug, Error)]
pub enum OrderError {
    /// The item is not part of the scope the operation runs in
    #[error("{collection} item {item_id} not found in scope {scope}")]
    ItemNotFound {
        collection: Collection,
        scope: Scope,
        item_id: i64,
    },

    /// Requested position outside `[0, max]`
    #[error("position {requested} out of range 0..={max}")]
    OutOfRange { requested: i64, max: i64 },

    /// Uniqueness violation reported by storage (e.g. module assigned twice)
    #[error("conflicting assignment: {0}")]
    ConflictingAssignment(String),

    /// Scope changed underneath the caller (stale count or serialization failure)
    #[error("concurrent modification: {0}")]
    Conflict(String),

    /// Atomic write failed for infrastructure reasons; nothing was applied
    #[error("transaction failed: {0}")]
    Transaction(String),

    /// Read outside of any ordering transaction failed
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for ordering operations
pub type OrderResult<T> = Result<T, OrderError>;

impl OrderError {
    /// Stale `expected_count` token
    pub fn stale_count(expected: i32, actual: i32) -> Self {
        Self::Conflict(format!(
            "expected {expected} items in scope, found {actual}"
        ))
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => return Self::ConflictingAssignment(db_err.message().to_string()),
                // serialization_failure, deadlock_detected
                Some("40001") | Some("40P01") => return Self::Conflict(db_err.message().to_string()),
                _ => {}
            }
        }
        Self::Transaction(err.to_string())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::ItemNotFound {
                collection,
                scope,
                item_id,
            } => AppError::with_message(ErrorCode::NotFound, err_message(collection, item_id))
                .with_detail("collection", collection.name())
                .with_detail("scope", scope.to_string())
                .with_detail("id", item_id),
            OrderError::OutOfRange { requested, max } => AppError::out_of_range(requested, max),
            OrderError::ConflictingAssignment(msg) => {
                AppError::with_message(ErrorCode::AlreadyExists, msg)
            }
            OrderError::Conflict(msg) => AppError::with_message(ErrorCode::OrderConflict, msg),
            OrderError::Transaction(msg) => {
                tracing::error!(error = %msg, "Ordering transaction failed");
                AppError::new(ErrorCode::TransactionFailed)
            }
            OrderError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage read failed");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

fn err_message(collection: Collection, item_id: i64) -> String {
    format!("{collection} item {item_id} not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_maps_to_validation_status() {
        let app: AppError = OrderError::OutOfRange {
            requested: 5,
            max: 4,
        }
        .into();
        assert_eq!(app.code, ErrorCode::OrderOutOfRange);
        assert_eq!(app.http_status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_transaction_failure_hides_cause() {
        let app: AppError = OrderError::Transaction("connection reset".into()).into();
        assert_eq!(app.code, ErrorCode::TransactionFailed);
        assert!(!app.message.contains("connection reset"));
    }

    #[test]
    fn test_stale_count_is_conflict() {
        let app: AppError = OrderError::stale_count(4, 5).into();
        assert_eq!(app.code, ErrorCode::OrderConflict);
        assert_eq!(app.http_status(), http::StatusCode::CONFLICT);
    }
}
