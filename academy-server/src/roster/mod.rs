//! Scope adapters
//!
//! Entity-level verbs on top of the ordering engine. Each adapter resolves the
//! scope of its collection, checks domain preconditions (existence, input
//! validation) before any ordering work, and translates engine errors into
//! domain error codes.

pub mod course_modules;
pub mod global;
pub mod projects;
pub mod team;

pub use course_modules::CourseModules;
pub use global::{GlobalEntry, GlobalRoster};
pub use projects::{ProjectGallery, StudentProjects};
pub use team::{TeamMembers, TeamRoster};

use shared::error::{AppError, ErrorCode};
use shared::models::ReorderResult;

use crate::ordering::engine::MutationReport;
use crate::ordering::{HealStatus, MoveOutcome, OrderError};

/// Engine error → domain error, reporting a vanished item with `code`
pub(crate) fn domain_error(code: ErrorCode) -> impl Fn(OrderError) -> AppError {
    move |err| match err {
        OrderError::ItemNotFound { item_id, .. } => entity_not_found(code, item_id),
        other => other.into(),
    }
}

pub(crate) fn entity_not_found(code: ErrorCode, id: i64) -> AppError {
    AppError::new(code).with_detail("id", id)
}

pub(crate) fn move_result(report: MutationReport<MoveOutcome>) -> ReorderResult {
    reorder_result(report.value.changed(), report.heal)
}

pub(crate) fn remove_result(report: MutationReport<i32>) -> ReorderResult {
    reorder_result(true, report.heal)
}

fn reorder_result(changed: bool, heal: HealStatus) -> ReorderResult {
    let repaired = heal.repaired();
    let (heal, heal_error) = heal.into_parts();
    ReorderResult {
        changed,
        repaired,
        heal,
        heal_error,
    }
}
