//! Ordered Collection Engine
//!
//! Keeps the `sort_order` field of a collection dense (`0..N-1`, no gaps, no
//! duplicates) under insert, move and delete.
//!
//! # Layers
//!
//! ```text
//! roster (scope adapters)      resolve scope, check domain preconditions
//!     │
//!     ▼
//! engine                       compute shift ranges and target positions
//!     │
//!     ▼
//! OrderTx (store contract)     count / shift / write / delete / read, atomically
//! ```
//!
//! A scope is a partition inside one collection: every team member shares the
//! [`Scope::Global`] roster, while course modules are partitioned by
//! [`Scope::Parent`] with the course id. Operations never look outside the
//! scope of the transaction they run in.

pub mod engine;
pub mod error;
pub mod store;

pub use engine::{HealPolicy, HealStatus, MoveOutcome, OrderEngine};
pub use error::{OrderError, OrderResult};
pub use store::{OrderStore, OrderTx};

use serde::{Deserialize, Serialize};

/// Ordered collections backed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    TeamMembers,
    StudentProjects,
    CourseModules,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TeamMembers => "team_members",
            Self::StudentProjects => "student_projects",
            Self::CourseModules => "course_modules",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Partition within which `sort_order` values must be dense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// The single roster shared by every item of the collection
    Global,
    /// Items owned by one parent entity (e.g. modules of one course)
    Parent(i64),
}

impl Scope {
    /// Parent id, if this is a per-parent scope
    pub fn parent_id(&self) -> Option<i64> {
        match self {
            Self::Global => None,
            Self::Parent(id) => Some(*id),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Parent(id) => write!(f, "parent:{id}"),
        }
    }
}

/// One ranked row as seen by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedItem {
    pub id: i64,
    pub sort_order: i32,
}

/// Range-shift update: add `delta` to every item with
/// `low <= sort_order <= high` (`high = None` is unbounded), except `exclude`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftRange {
    pub low: i32,
    pub high: Option<i32>,
    pub delta: i32,
    pub exclude: Option<i64>,
}

impl ShiftRange {
    /// `[low, ∞)` shifted by `delta`
    pub fn starting_at(low: i32, delta: i32) -> Self {
        Self {
            low,
            high: None,
            delta,
            exclude: None,
        }
    }

    /// `[low, high]` shifted by `delta`
    pub fn between(low: i32, high: i32, delta: i32) -> Self {
        Self {
            low,
            high: Some(high),
            delta,
            exclude: None,
        }
    }

    pub fn excluding(mut self, item_id: i64) -> Self {
        self.exclude = Some(item_id);
        self
    }

    /// Whether an item at `sort_order` falls inside the range
    pub fn contains(&self, item_id: i64, sort_order: i32) -> bool {
        if self.exclude == Some(item_id) {
            return false;
        }
        sort_order >= self.low && self.high.is_none_or(|high| sort_order <= high)
    }
}
