//! Reordering payloads shared by every ordered collection

use serde::{Deserialize, Serialize};

/// Move an item to an explicit zero-based position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveToRequest {
    /// Signed: negative positions are rejected as out of range.
    pub order: i64,
    /// Collection size the caller last saw; rejected with a conflict when stale
    pub expected_count: Option<i32>,
}

/// Dashboard "move up / move down" action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Move one step payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveStepRequest {
    pub direction: MoveDirection,
}

/// Outcome of the consistency pass that follows a reorder/removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealState {
    /// Disabled, or nothing was written
    Skipped,
    Clean,
    Repaired,
    /// The pass failed; the reorder itself is committed
    Failed,
}

/// Result of a reorder/removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderResult {
    /// Whether any row was written
    pub changed: bool,
    /// Whether the follow-up consistency pass had to repair drift
    pub repaired: bool,
    pub heal: HealState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heal_error: Option<String>,
}

/// Result of an explicit normalize request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeResult {
    pub repaired: bool,
}
