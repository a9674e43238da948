//! Unified error codes for the Academy backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Content errors (team, student projects, courses, modules)
//! - 7xxx: Ordering errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 6xxx: Content ====================
    /// Team member not found
    TeamMemberNotFound = 6001,
    /// Student project not found
    StudentProjectNotFound = 6101,
    /// Course not found
    CourseNotFound = 6201,
    /// Module not found
    ModuleNotFound = 6301,
    /// Module is not assigned to the course
    ModuleNotAssigned = 6302,
    /// Module is already assigned to the course
    ModuleAlreadyAssigned = 6303,

    // ==================== 7xxx: Ordering ====================
    /// Requested position is outside the collection
    OrderOutOfRange = 7001,
    /// Collection changed underneath the caller
    OrderConflict = 7002,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
    /// Atomic write failed and was rolled back
    TransactionFailed = 9010,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Content
            ErrorCode::TeamMemberNotFound => "Team member not found",
            ErrorCode::StudentProjectNotFound => "Student project not found",
            ErrorCode::CourseNotFound => "Course not found",
            ErrorCode::ModuleNotFound => "Module not found",
            ErrorCode::ModuleNotAssigned => "Module is not assigned to this course",
            ErrorCode::ModuleAlreadyAssigned => "Module is already assigned to this course",

            // Ordering
            ErrorCode::OrderOutOfRange => "Requested position is out of range",
            ErrorCode::OrderConflict => "Collection was modified concurrently, refresh and retry",

            // System
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TransactionFailed => "Transaction failed, no changes were applied",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Content
            6001 => Ok(ErrorCode::TeamMemberNotFound),
            6101 => Ok(ErrorCode::StudentProjectNotFound),
            6201 => Ok(ErrorCode::CourseNotFound),
            6301 => Ok(ErrorCode::ModuleNotFound),
            6302 => Ok(ErrorCode::ModuleNotAssigned),
            6303 => Ok(ErrorCode::ModuleAlreadyAssigned),

            // Ordering
            7001 => Ok(ErrorCode::OrderOutOfRange),
            7002 => Ok(ErrorCode::OrderConflict),

            // System
            9002 => Ok(ErrorCode::DatabaseError),
            9010 => Ok(ErrorCode::TransactionFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip_through_u16() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::ModuleAlreadyAssigned,
            ErrorCode::OrderOutOfRange,
            ErrorCode::TransactionFailed,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderConflict).unwrap();
        assert_eq!(json, "7002");
        let code: ErrorCode = serde_json::from_str("6201").unwrap();
        assert_eq!(code, ErrorCode::CourseNotFound);
    }

    #[test]
    fn test_display_is_numeric() {
        assert_eq!(ErrorCode::OrderOutOfRange.to_string(), "7001");
    }
}
