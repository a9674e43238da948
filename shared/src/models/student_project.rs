//! Student Project Model

use serde::{Deserialize, Serialize};

/// Student-project card in the showcase gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StudentProject {
    pub id: i64,
    pub title: String,
    pub student_name: String,
    pub description: Option<String>,
    /// External link (repository, demo, ...)
    pub link: Option<String>,
    pub sort_order: i32,
    pub created_at: i64,
}

/// Create student project payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProjectCreate {
    pub title: String,
    pub student_name: String,
    pub description: Option<String>,
    pub link: Option<String>,
}
