//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::TeamMemberNotFound
            | Self::StudentProjectNotFound
            | Self::CourseNotFound
            | Self::ModuleNotFound
            | Self::ModuleNotAssigned => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::ModuleAlreadyAssigned | Self::OrderConflict => {
                StatusCode::CONFLICT
            }

            // 500 Internal Server Error
            Self::DatabaseError | Self::TransactionFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::TeamMemberNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::ModuleNotAssigned.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(
            ErrorCode::ModuleAlreadyAssigned.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ErrorCode::OrderConflict.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_out_of_range_is_bad_request() {
        assert_eq!(
            ErrorCode::OrderOutOfRange.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_system_status() {
        assert_eq!(
            ErrorCode::TransactionFailed.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
