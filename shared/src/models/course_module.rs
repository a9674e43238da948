//! Course ↔ Module assignment Model

use serde::{Deserialize, Serialize};

/// Link between a course and one of its modules
///
/// Each course is its own ordering scope: `sort_order` is dense per `course_id`.
/// `(course_id, module_id)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CourseModule {
    pub id: i64,
    pub course_id: i64,
    pub module_id: i64,
    pub sort_order: i32,
}

/// Assignment enriched with course and module display data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CourseModuleDetail {
    pub id: i64,
    pub course_id: i64,
    pub course_title: String,
    pub module_id: i64,
    pub module_title: String,
    pub sort_order: i32,
}

/// Assign module payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignModuleRequest {
    pub module_id: i64,
    /// Target position; appended at the end when absent
    pub order: Option<i64>,
    /// Course size the caller last saw; rejected with a conflict when stale
    pub expected_count: Option<i32>,
}
