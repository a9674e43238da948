//! Data models
//!
//! Shared between academy-server and the admin dashboard (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes.

pub mod course;
pub mod course_module;
pub mod ordering;
pub mod student_project;
pub mod team_member;

// Re-exports
pub use course::*;
pub use course_module::*;
pub use ordering::*;
pub use student_project::*;
pub use team_member::*;
