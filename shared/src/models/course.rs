//! Course and Module Models

use serde::{Deserialize, Serialize};

/// Course entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub slug: String,
}

/// Create course payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCreate {
    pub title: String,
    pub slug: String,
}

/// Reusable learning module, assignable to many courses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Module {
    pub id: i64,
    pub title: String,
}

/// Create module payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleCreate {
    pub title: String,
}
