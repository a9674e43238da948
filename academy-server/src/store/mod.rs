//! Persistence adapters
//!
//! Two implementations of the same contract:
//! - [`MemoryStore`]: process-local, used in development and tests
//! - [`PgStore`]: PostgreSQL via sqlx, used in production
//!
//! Both expose the engine contract ([`OrderStore`]) plus the handful of reads
//! and row inserts the scope adapters need.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use shared::models::{
    Course, CourseCreate, CourseModuleDetail, Module, ModuleCreate, StudentProject,
    StudentProjectCreate, TeamMember, TeamMemberCreate,
};

use crate::ordering::{OrderResult, OrderStore, OrderTx};

/// Row to create inside an ordering transaction
#[derive(Debug, Clone)]
pub enum NewItem {
    TeamMember(TeamMemberCreate),
    StudentProject(StudentProjectCreate),
    /// Links the transaction's course scope to a module
    CourseModule { module_id: i64 },
}

/// Transaction that can also create rows of its collection
#[async_trait]
pub trait ItemWriter: OrderTx {
    /// Insert `item` at `sort_order`, returning the new row id.
    ///
    /// Does not shift anything: pair it with `engine::append` or
    /// `engine::insert_at` in the same transaction.
    async fn insert_item(&mut self, item: NewItem, sort_order: i32) -> OrderResult<i64>;
}

/// Everything the scope adapters need from storage
#[async_trait]
pub trait ContentStore: OrderStore<Tx: ItemWriter> {
    async fn list_team_members(&self) -> OrderResult<Vec<TeamMember>>;

    async fn find_team_member(&self, id: i64) -> OrderResult<Option<TeamMember>>;

    async fn list_student_projects(&self) -> OrderResult<Vec<StudentProject>>;

    async fn find_student_project(&self, id: i64) -> OrderResult<Option<StudentProject>>;

    async fn find_course(&self, id: i64) -> OrderResult<Option<Course>>;

    async fn create_course(&self, data: &CourseCreate) -> OrderResult<Course>;

    async fn find_module(&self, id: i64) -> OrderResult<Option<Module>>;

    async fn create_module(&self, data: &ModuleCreate) -> OrderResult<Module>;

    /// Modules of a course joined with display data, ascending by position
    async fn list_course_modules(&self, course_id: i64) -> OrderResult<Vec<CourseModuleDetail>>;

    async fn find_course_module(
        &self,
        course_id: i64,
        module_id: i64,
    ) -> OrderResult<Option<CourseModuleDetail>>;
}
