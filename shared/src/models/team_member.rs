//! Team Member Model

use serde::{Deserialize, Serialize};

/// Team member shown on the public "our team" page
///
/// Members share one global roster; `sort_order` is their dense position in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    /// Job title displayed under the name
    pub role: String,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub sort_order: i32,
    pub created_at: i64,
}

/// Create team member payload
///
/// There is no `sort_order` here: new members are always appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberCreate {
    pub name: String,
    pub role: String,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}
