//! Board counts: a serializable per-status summary of a family's task list.

use serde::{Deserialize, Serialize};

use crate::domain::{TaskRecord, TaskStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCounts {
    pub open: usize,
    pub claimed: usize,
    pub review: usize,
    pub done: usize,
}

impl BoardCounts {
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a TaskRecord>) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            match task.status {
                TaskStatus::Open => counts.open += 1,
                TaskStatus::Claimed => counts.claimed += 1,
                TaskStatus::Review => counts.review += 1,
                TaskStatus::Done => counts.done += 1,
            }
        }
        counts
    }

    /// Everything still needing attention.
    pub fn outstanding(&self) -> usize {
        self.open + self.claimed + self.review
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FamilyId, MemberId, MemberRef, TaskDraft, TaskId};
    use chrono::{TimeZone, Utc};
    use ulid::Ulid;

    #[test]
    fn tally_counts_each_status() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let family = FamilyId::from_ulid(Ulid::new());
        let creator = MemberId::from_ulid(Ulid::new());
        let fresh = |title: &str| {
            TaskRecord::from_draft(
                TaskId::from_ulid(Ulid::new()),
                family,
                creator,
                None,
                TaskDraft::new(title),
                now,
            )
        };

        let open = fresh("a");
        let mut claimed = fresh("b");
        claimed.claim_by(MemberRef::new(creator, "x"), now);
        let mut review = fresh("c");
        review.claim_by(MemberRef::new(creator, "x"), now);
        review.mark_review();
        let mut done = fresh("d");
        done.mark_done(now);

        let counts = BoardCounts::tally([&open, &claimed, &review, &done]);
        assert_eq!(
            counts,
            BoardCounts {
                open: 1,
                claimed: 1,
                review: 1,
                done: 1
            }
        );
        assert_eq!(counts.outstanding(), 3);
    }
}
