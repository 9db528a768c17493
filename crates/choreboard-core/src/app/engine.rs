//! Workflow engine: the authoritative state machine over task records.
//!
//! Every operation follows the same shape:
//! 1. load the record (family-scoped),
//! 2. check the actor guard against the roster snapshot,
//! 3. build the successor record via the record's transition methods,
//! 4. commit through the store's conditional (version-checked) update,
//! 5. emit notifier intents after the commit stuck.
//!
//! Any (state, intent, actor) combination outside the allowed table is a
//! `NotAllowed` — a distinguishable failure, never a silent no-op. A lost
//! conditional write surfaces as `Conflict`; the caller re-fetches and
//! decides, the engine never retries on its own.

use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;

use crate::app::recurrence;
use crate::domain::{
    EngineError, FamilyId, Member, MemberId, MemberRef, TaskDraft, TaskId, TaskPatch, TaskRecord,
    TaskStatus,
};
use crate::ports::{
    Clock, IdGenerator, MemberDirectory, NoopNotifier, Notifier, StoreError, SystemClock,
    TaskStore, UlidGenerator,
};

/// Wiring error: the engine refuses to start half-assembled.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("engine requires a task store")]
    MissingStore,

    #[error("engine requires a member directory")]
    MissingRoster,
}

/// Builder for `WorkflowEngine`. Store and roster are mandatory; clock,
/// notifier and id generation default to the production implementations.
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn TaskStore>>,
    roster: Option<Arc<dyn MemberDirectory>>,
    notifier: Option<Arc<dyn Notifier>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn roster(mut self, roster: Arc<dyn MemberDirectory>) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn build(self) -> Result<WorkflowEngine, BuildError> {
        Ok(WorkflowEngine {
            store: self.store.ok_or(BuildError::MissingStore)?,
            roster: self.roster.ok_or(BuildError::MissingRoster)?,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(NoopNotifier)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            ids: self
                .ids
                .unwrap_or_else(|| Arc::new(UlidGenerator::new(SystemClock))),
        })
    }
}

/// The task workflow engine. Owns no threads, never blocks: a pure
/// request/response transformer invoked by concurrent external callers.
pub struct WorkflowEngine {
    store: Arc<dyn TaskStore>,
    roster: Arc<dyn MemberDirectory>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl WorkflowEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Create a task. Any member may create; only a parent may pre-assign.
    pub async fn create(
        &self,
        family: FamilyId,
        actor: MemberId,
        draft: TaskDraft,
    ) -> Result<TaskRecord, EngineError> {
        draft.validate()?;
        let actor = self.actor(family, actor).await?;

        let assigned_to = match draft.assigned_to {
            None => None,
            Some(target) => {
                if !actor.is_parent() {
                    return Err(EngineError::not_allowed("only a parent may pre-assign"));
                }
                Some(self.member_ref(family, target).await?)
            }
        };

        let task = TaskRecord::from_draft(
            self.ids.task_id(),
            family,
            actor.id,
            assigned_to,
            draft,
            self.clock.now(),
        );
        self.store
            .insert(task.clone())
            .await
            .map_err(map_store_error)?;

        if let Some(assignee) = &task.assigned_to {
            self.notifier
                .task_assigned(task.id, assignee.id, &task.title)
                .await;
        }
        Ok(task)
    }

    /// Take personal responsibility for an open task.
    pub async fn claim(
        &self,
        family: FamilyId,
        task_id: TaskId,
        actor: MemberId,
    ) -> Result<TaskRecord, EngineError> {
        let actor = self.actor(family, actor).await?;
        let mut task = self.load(family, task_id).await?;

        if task.status != TaskStatus::Open {
            return Err(EngineError::not_allowed(format!(
                "cannot claim a task in {:?}",
                task.status
            )));
        }
        if let Some(assignee) = &task.assigned_to
            && assignee.id != actor.id
        {
            return Err(EngineError::not_allowed(format!(
                "task is reserved for {}",
                assignee.name
            )));
        }

        task.claim_by(member_ref(&actor), self.clock.now());
        self.commit(task).await
    }

    /// Give an active claim back. Strictly `Claimed` + own claim only — an
    /// already-open task is a hard `NotAllowed`, uniform with every other
    /// out-of-table combination.
    pub async fn unclaim(
        &self,
        family: FamilyId,
        task_id: TaskId,
        actor: MemberId,
    ) -> Result<TaskRecord, EngineError> {
        let actor = self.actor(family, actor).await?;
        let mut task = self.load(family, task_id).await?;

        self.ensure_own_claim(&task, &actor, "unclaim")?;
        task.release_claim();
        self.commit(task).await
    }

    /// Claimant declares the chore finished; it now awaits parental review.
    pub async fn request_completion(
        &self,
        family: FamilyId,
        task_id: TaskId,
        actor: MemberId,
    ) -> Result<TaskRecord, EngineError> {
        let actor = self.actor(family, actor).await?;
        let mut task = self.load(family, task_id).await?;

        self.ensure_own_claim(&task, &actor, "request completion for")?;
        // Auto-completing tasks never enter review; they finish through
        // `auto_complete` instead.
        if task.auto_completes() {
            return Err(EngineError::not_allowed("auto-completing tasks skip review"));
        }
        task.mark_review();
        self.commit(task).await
    }

    /// Parent approves a reviewed task: terminal `Done` for one-off chores,
    /// recurrence rollover for repeating ones.
    pub async fn approve(
        &self,
        family: FamilyId,
        task_id: TaskId,
        actor: MemberId,
    ) -> Result<TaskRecord, EngineError> {
        let actor = self.actor(family, actor).await?;
        let mut task = self.load(family, task_id).await?;

        ensure_parent(&actor, "approve")?;
        if task.status != TaskStatus::Review {
            return Err(EngineError::not_allowed(format!(
                "cannot approve a task in {:?}",
                task.status
            )));
        }

        self.complete(&mut task);
        self.commit(task).await
    }

    /// Parent rejects a reviewed task: back to `Open`, claim cleared.
    pub async fn reject(
        &self,
        family: FamilyId,
        task_id: TaskId,
        actor: MemberId,
    ) -> Result<TaskRecord, EngineError> {
        let actor = self.actor(family, actor).await?;
        let mut task = self.load(family, task_id).await?;

        ensure_parent(&actor, "reject")?;
        if task.status != TaskStatus::Review {
            return Err(EngineError::not_allowed(format!(
                "cannot reject a task in {:?}",
                task.status
            )));
        }

        task.release_claim();
        self.commit(task).await
    }

    /// Unattended completion for rules flagged `auto_complete`: skips review
    /// entirely and rolls straight into the next cycle.
    pub async fn auto_complete(
        &self,
        family: FamilyId,
        task_id: TaskId,
        actor: MemberId,
    ) -> Result<TaskRecord, EngineError> {
        let actor = self.actor(family, actor).await?;
        let mut task = self.load(family, task_id).await?;

        if !task.auto_completes() {
            return Err(EngineError::not_allowed(
                "task has no auto-completing repeat rule",
            ));
        }
        if !matches!(task.status, TaskStatus::Open | TaskStatus::Claimed) {
            return Err(EngineError::not_allowed(format!(
                "cannot auto-complete a task in {:?}",
                task.status
            )));
        }
        let is_assignee = task.assigned_to.as_ref().is_some_and(|a| a.id == actor.id);
        let is_claimant = task.claimed_by.as_ref().is_some_and(|c| c.id == actor.id);
        if !is_assignee && !is_claimant {
            return Err(EngineError::not_allowed(
                "only the assignee or current claimant may auto-complete",
            ));
        }

        self.complete(&mut task);
        self.commit(task).await
    }

    /// Parent assigns (or clears the assignment of) a task. Reassignment
    /// always restarts the workflow: claim, acceptance and completion are
    /// wiped and the status forced back to `Open`.
    pub async fn assign(
        &self,
        family: FamilyId,
        task_id: TaskId,
        actor: MemberId,
        target: Option<MemberId>,
    ) -> Result<TaskRecord, EngineError> {
        let actor = self.actor(family, actor).await?;
        let mut task = self.load(family, task_id).await?;

        ensure_parent(&actor, "assign")?;
        let target_ref = match target {
            None => None,
            Some(member) => Some(self.member_ref(family, member).await?),
        };

        task.assign_to(target_ref);
        let task = self.commit(task).await?;

        if let Some(assignee) = &task.assigned_to {
            self.notifier
                .task_assigned(task.id, assignee.id, &task.title)
                .await;
        }
        Ok(task)
    }

    /// Edit title / due date / repeat rule / reminder. Creator or parent;
    /// allowed while the task is active, or after completion for one-off
    /// tasks. Never touches status.
    pub async fn edit(
        &self,
        family: FamilyId,
        task_id: TaskId,
        actor: MemberId,
        patch: TaskPatch,
    ) -> Result<TaskRecord, EngineError> {
        let actor = self.actor(family, actor).await?;
        let mut task = self.load(family, task_id).await?;

        if task.created_by != actor.id && !actor.is_parent() {
            return Err(EngineError::not_allowed(
                "only the creator or a parent may edit",
            ));
        }
        if task.status == TaskStatus::Done && task.repeat.is_some() {
            return Err(EngineError::not_allowed(
                "a completed recurring task can no longer be edited",
            ));
        }

        patch.apply(&mut task)?;
        self.commit(task).await
    }

    /// Hard delete, any status. Creator or parent.
    pub async fn delete(
        &self,
        family: FamilyId,
        task_id: TaskId,
        actor: MemberId,
    ) -> Result<(), EngineError> {
        let actor = self.actor(family, actor).await?;
        let task = self.load(family, task_id).await?;

        if task.created_by != actor.id && !actor.is_parent() {
            return Err(EngineError::not_allowed(
                "only the creator or a parent may delete",
            ));
        }
        self.store
            .delete(family, task_id)
            .await
            .map_err(map_store_error)
    }

    /// Emit `task_due_soon` for every active task whose reminder window
    /// covers this instant. Returns how many intents went out. The caller
    /// owns the timer that decides when to sweep.
    pub async fn due_soon_sweep(&self, family: FamilyId) -> usize {
        let now = self.clock.now();
        let mut emitted = 0;

        for task in self.store.list_by_family(family).await {
            if !task.status.is_active() {
                continue;
            }
            let (Some(due), Some(offset)) = (task.due_at, task.reminder_offset_minutes) else {
                continue;
            };
            let window_opens = due - Duration::minutes(i64::from(offset));
            if now < window_opens || now >= due {
                continue;
            }
            // Remind whoever is on the hook: the claimant if someone took it
            // on, otherwise the assignee. Shared unclaimed tasks have no
            // recipient.
            let recipient = task.claimed_by.as_ref().or(task.assigned_to.as_ref());
            if let Some(member) = recipient {
                self.notifier
                    .task_due_soon(task.id, member.id, &task.title, due)
                    .await;
                emitted += 1;
            }
        }
        emitted
    }

    /// The family's full task list (resolver/projection input).
    pub async fn tasks(&self, family: FamilyId) -> Vec<TaskRecord> {
        self.store.list_by_family(family).await
    }

    /// Fetch one record for display.
    pub async fn task(&self, family: FamilyId, task_id: TaskId) -> Result<TaskRecord, EngineError> {
        self.load(family, task_id).await
    }

    fn complete(&self, task: &mut TaskRecord) {
        let now = self.clock.now();
        match task.repeat {
            Some(rule) => recurrence::roll_over(task, rule, now),
            None => task.mark_done(now),
        }
    }

    fn ensure_own_claim(
        &self,
        task: &TaskRecord,
        actor: &Member,
        verb: &str,
    ) -> Result<(), EngineError> {
        if task.status != TaskStatus::Claimed {
            return Err(EngineError::not_allowed(format!(
                "cannot {verb} a task in {:?}",
                task.status
            )));
        }
        let owns = task.claimed_by.as_ref().is_some_and(|c| c.id == actor.id);
        if !owns {
            return Err(EngineError::not_allowed(format!(
                "only the claimant may {verb} this task"
            )));
        }
        Ok(())
    }

    async fn actor(&self, family: FamilyId, id: MemberId) -> Result<Member, EngineError> {
        self.roster
            .member(family, id)
            .await
            .ok_or_else(|| EngineError::not_found(format!("member {id}")))
    }

    async fn member_ref(&self, family: FamilyId, id: MemberId) -> Result<MemberRef, EngineError> {
        let member = self.actor(family, id).await?;
        Ok(MemberRef::new(member.id, member.display_name))
    }

    async fn load(&self, family: FamilyId, id: TaskId) -> Result<TaskRecord, EngineError> {
        self.store.get(family, id).await.map_err(map_store_error)
    }

    async fn commit(&self, next: TaskRecord) -> Result<TaskRecord, EngineError> {
        self.store.update(next).await.map_err(map_store_error)
    }
}

fn member_ref(member: &Member) -> MemberRef {
    MemberRef::new(member.id, member.display_name.clone())
}

fn ensure_parent(actor: &Member, verb: &str) -> Result<(), EngineError> {
    if !actor.is_parent() {
        return Err(EngineError::not_allowed(format!("only a parent may {verb}")));
    }
    Ok(())
}

fn map_store_error(err: StoreError) -> EngineError {
    match err {
        StoreError::NotFound => EngineError::not_found("task"),
        StoreError::Conflict => EngineError::Conflict,
        // An id collision on insert means another device raced us to it.
        StoreError::Duplicate => EngineError::Conflict,
    }
}
