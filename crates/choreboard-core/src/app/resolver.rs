//! Assignment resolver: who sees which tasks.
//!
//! Read-side projections only — nothing here mutates state, and nothing here
//! errors. When the viewer cannot be resolved the projections fail open and
//! show more rather than less: hiding a chore incorrectly is worse than
//! over-showing one.

use crate::domain::{Member, TaskRecord};

/// Requested visibility scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Tasks assigned to the viewer, plus everything shared.
    Mine,

    /// Everything outstanding that isn't just the viewer's: shared tasks
    /// plus tasks assigned to someone else.
    Family,

    /// Shared tasks plus tasks assigned to any child-role member.
    Kids,
}

/// Active (non-done) tasks visible to `viewer` under `scope`.
///
/// `roster` is the family's member snapshot; it is only consulted for the
/// kids scope. An unknown viewer (`None`) fails open: the full active list
/// comes back.
pub fn visible<'a>(
    viewer: Option<&Member>,
    scope: Scope,
    tasks: &'a [TaskRecord],
    roster: &[Member],
) -> Vec<&'a TaskRecord> {
    let active = tasks.iter().filter(|t| t.status.is_active());

    let Some(viewer) = viewer else {
        return active.collect();
    };

    active
        .filter(|task| match (&task.assigned_to, scope) {
            (None, _) => true, // shared tasks show up in every scope
            (Some(a), Scope::Mine) => a.id == viewer.id,
            (Some(a), Scope::Family) => a.id != viewer.id,
            (Some(a), Scope::Kids) => roster
                .iter()
                .any(|member| member.id == a.id && member.is_child()),
        })
        .collect()
}

/// Completed tasks, newest completion first (history views).
pub fn history(tasks: &[TaskRecord]) -> Vec<&TaskRecord> {
    let mut done: Vec<&TaskRecord> = tasks.iter().filter(|t| t.status.is_terminal()).collect();
    done.sort_by(|a, b| b.completed_at.cmp(&a.completed_at).then(a.id.cmp(&b.id)));
    done
}

/// The newest `n` of a projection: created_at descending, ties broken by id
/// so the order is deterministic across devices.
pub fn latest<'a>(mut tasks: Vec<&'a TaskRecord>, n: usize) -> Vec<&'a TaskRecord> {
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
    tasks.truncate(n);
    tasks
}

/// Display label for who a task belongs to: the assignee's cached name, or
/// "family" for shared tasks.
pub fn assignee_label(task: &TaskRecord) -> &str {
    task.assigned_to
        .as_ref()
        .map(|a| a.name.as_str())
        .unwrap_or("family")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        FamilyId, MemberId, MemberRef, Role, TaskDraft, TaskId, TaskStatus,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rstest::rstest;
    use ulid::Ulid;

    struct Fixture {
        dana: Member,  // parent
        alice: Member, // child
        bob: Member,   // child
        tasks: Vec<TaskRecord>,
    }

    fn member(name: &str, role: Role) -> Member {
        Member::new(MemberId::from_ulid(Ulid::new()), name, role)
    }

    fn task_for(creator: &Member, assignee: Option<&Member>, created_at: DateTime<Utc>) -> TaskRecord {
        TaskRecord::from_draft(
            TaskId::from_ulid(Ulid::new()),
            FamilyId::from_ulid(Ulid::new()),
            creator.id,
            assignee.map(|m| MemberRef::new(m.id, m.display_name.clone())),
            TaskDraft::new("chore"),
            created_at,
        )
    }

    fn fixture() -> Fixture {
        let dana = member("Dana", Role::Parent);
        let alice = member("Alice", Role::Child);
        let bob = member("Bob", Role::Child);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();

        let shared = task_for(&dana, None, t0);
        let alices = task_for(&dana, Some(&alice), t0 + Duration::hours(1));
        let bobs = task_for(&dana, Some(&bob), t0 + Duration::hours(2));
        let danas = task_for(&dana, Some(&dana), t0 + Duration::hours(3));
        let mut finished = task_for(&dana, Some(&alice), t0 + Duration::hours(4));
        finished.mark_done(t0 + Duration::hours(5));

        Fixture {
            dana,
            alice,
            bob,
            tasks: vec![shared, alices, bobs, danas, finished],
        }
    }

    fn roster(f: &Fixture) -> Vec<Member> {
        vec![f.dana.clone(), f.alice.clone(), f.bob.clone()]
    }

    #[test]
    fn mine_is_own_plus_shared() {
        let f = fixture();
        let mine = visible(Some(&f.alice), Scope::Mine, &f.tasks, &roster(&f));

        assert_eq!(mine.len(), 2); // shared + alice's open task
        assert!(mine.iter().all(|t| {
            t.is_shared() || t.assigned_to.as_ref().unwrap().id == f.alice.id
        }));
    }

    #[test]
    fn family_is_everything_that_is_not_just_mine() {
        let f = fixture();
        let fam = visible(Some(&f.alice), Scope::Family, &f.tasks, &roster(&f));

        // shared + bob's + dana's; alice's own assigned task is excluded
        assert_eq!(fam.len(), 3);
        assert!(fam.iter().all(|t| {
            t.assigned_to.as_ref().map(|a| a.id) != Some(f.alice.id)
        }));
    }

    #[test]
    fn kids_scope_keeps_child_assignments_and_shared() {
        let f = fixture();
        let kids = visible(Some(&f.dana), Scope::Kids, &f.tasks, &roster(&f));

        // shared + alice's + bob's; dana's own task (parent) is excluded
        assert_eq!(kids.len(), 3);
        assert!(kids.iter().all(|t| {
            t.assigned_to.as_ref().map(|a| a.id) != Some(f.dana.id)
        }));
    }

    #[rstest]
    #[case::mine(Scope::Mine)]
    #[case::family(Scope::Family)]
    #[case::kids(Scope::Kids)]
    fn unknown_viewer_fails_open(#[case] scope: Scope) {
        let f = fixture();
        let all = visible(None, scope, &f.tasks, &roster(&f));
        assert_eq!(all.len(), 4); // every active task, nothing hidden
    }

    #[rstest]
    #[case::mine(Scope::Mine)]
    #[case::family(Scope::Family)]
    #[case::kids(Scope::Kids)]
    fn done_tasks_never_appear_in_active_scopes(#[case] scope: Scope) {
        let f = fixture();
        for viewer in [Some(&f.dana), Some(&f.alice), None] {
            let seen = visible(viewer, scope, &f.tasks, &roster(&f));
            assert!(seen.iter().all(|t| t.status != TaskStatus::Done));
        }
    }

    #[test]
    fn done_tasks_are_retained_for_history() {
        let f = fixture();
        let hist = history(&f.tasks);
        assert_eq!(hist.len(), 1);
        assert_eq!(hist[0].status, TaskStatus::Done);
    }

    #[test]
    fn latest_orders_newest_first_with_deterministic_ties() {
        let f = fixture();
        let all = visible(None, Scope::Family, &f.tasks, &roster(&f));

        let top2 = latest(all.clone(), 2);
        assert_eq!(top2.len(), 2);
        assert!(top2[0].created_at >= top2[1].created_at);

        // Same input, same order.
        assert_eq!(
            latest(all.clone(), 4).iter().map(|t| t.id).collect::<Vec<_>>(),
            latest(all, 4).iter().map(|t| t.id).collect::<Vec<_>>(),
        );
    }

    #[test]
    fn latest_breaks_created_at_ties_by_id() {
        let dana = member("Dana", Role::Parent);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let a = task_for(&dana, None, t0);
        let b = task_for(&dana, None, t0);
        let tasks = vec![a.clone(), b.clone()];

        let ordered = latest(tasks.iter().collect(), 2);
        let expected_first = a.id.min(b.id);
        assert_eq!(ordered[0].id, expected_first);
    }

    #[test]
    fn assignee_label_falls_back_to_family() {
        let f = fixture();
        assert_eq!(assignee_label(&f.tasks[0]), "family");
        assert_eq!(assignee_label(&f.tasks[1]), "Alice");
    }
}
