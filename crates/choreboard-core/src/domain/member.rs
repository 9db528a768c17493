//! Family members and roles.
//!
//! The member directory itself lives behind `ports::MemberDirectory`; the
//! engine only ever sees this read-only snapshot shape. Role checks are
//! evaluated against the latest snapshot the directory hands out — staleness
//! is tolerated because every write is re-validated by the store's
//! conditional update at commit time.

use serde::{Deserialize, Serialize};

use super::ids::MemberId;

/// Role of a member within the family.
///
/// Parents hold the elevated permissions: assign, approve, reject, and
/// delete other members' tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Parent,
    Child,
}

/// A family member as seen by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
    pub role: Role,
}

impl Member {
    pub fn new(id: MemberId, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role,
        }
    }

    pub fn is_parent(&self) -> bool {
        self.role == Role::Parent
    }

    pub fn is_child(&self) -> bool {
        self.role == Role::Child
    }
}
