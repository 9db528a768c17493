//! In-memory member directory (tests and demo binary).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{FamilyId, Member, MemberId};
use crate::ports::MemberDirectory;

/// A static roster snapshot keyed by family.
#[derive(Default)]
pub struct InMemoryRoster {
    families: HashMap<FamilyId, Vec<Member>>,
}

impl InMemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_family(mut self, family: FamilyId, members: Vec<Member>) -> Self {
        self.families.insert(family, members);
        self
    }
}

#[async_trait]
impl MemberDirectory for InMemoryRoster {
    async fn member(&self, family: FamilyId, id: MemberId) -> Option<Member> {
        self.families
            .get(&family)?
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    async fn members(&self, family: FamilyId) -> Vec<Member> {
        self.families.get(&family).cloned().unwrap_or_default()
    }
}
