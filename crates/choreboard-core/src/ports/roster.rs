//! MemberDirectory port - the family roster, read-only from here.
//!
//! Identity, invite codes and role management live elsewhere; the engine only
//! asks "who is this member and are they a parent". Answers are snapshots —
//! a role changing mid-operation is tolerated because the write itself is
//! still guarded by the store's conditional update.

use async_trait::async_trait;

use crate::domain::{FamilyId, Member, MemberId};

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Look up one member within the family's scope.
    async fn member(&self, family: FamilyId, id: MemberId) -> Option<Member>;

    /// The family's full roster (used by the kids-scope projection).
    async fn members(&self, family: FamilyId) -> Vec<Member>;
}
