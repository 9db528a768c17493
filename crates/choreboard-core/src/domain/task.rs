//! Task record: the single source of truth for one chore instance.
//!
//! Design:
//! - All state transitions happen through methods here; the workflow engine
//!   decides *whether* a transition is allowed, the record knows *how* to
//!   perform it without breaking its own invariants.
//! - `version` is the optimistic-concurrency token: the store only applies
//!   an update when the incoming record's version matches the stored one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::EngineError;
use super::ids::{FamilyId, MemberId, TaskId};
use super::repeat::RepeatRule;
use super::status::TaskStatus;

/// The reminder offsets the UI offers; anything else is rejected at draft
/// validation.
pub const REMINDER_OFFSETS_MINUTES: &[u32] = &[15, 30, 60];

/// A denormalized member reference: identity plus a display-name cache.
///
/// The name is presentation data only — authority over who a member *is*
/// stays with the member directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRef {
    pub id: MemberId,
    pub name: String,
}

impl MemberRef {
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One chore instance.
///
/// Invariants (enforced by the transition methods below, checkable via
/// `invariants_hold`):
/// - `status == Claimed` iff `claimed_by` is set
/// - `status == Done` implies `completed_at` is set and >= `created_at`
/// - a rule with `auto_complete` never sits in `Review`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub family_id: FamilyId,
    pub title: String,
    pub status: TaskStatus,

    /// Absence means "anytime".
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    /// When the current claimant took the task on.
    pub accepted_at: Option<DateTime<Utc>>,

    pub created_by: MemberId,

    /// Pre-assignment set by a parent: a constraint on who may claim.
    pub assigned_to: Option<MemberRef>,

    /// The member actively executing the task (the act of taking it on).
    pub claimed_by: Option<MemberRef>,

    pub repeat: Option<RepeatRule>,

    /// Minutes before `due_at` at which the reminder window opens.
    /// Meaningful only when `due_at` is set.
    pub reminder_offset_minutes: Option<u32>,

    /// Optimistic concurrency token, bumped by the store on every applied
    /// update.
    pub version: u64,
}

impl TaskRecord {
    /// Materialize a validated draft into a fresh open record.
    pub fn from_draft(
        id: TaskId,
        family_id: FamilyId,
        created_by: MemberId,
        assigned_to: Option<MemberRef>,
        draft: TaskDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            family_id,
            title: draft.title,
            status: TaskStatus::Open,
            due_at: draft.due_at,
            created_at: now,
            completed_at: None,
            accepted_at: None,
            created_by,
            assigned_to,
            claimed_by: None,
            repeat: draft.repeat,
            reminder_offset_minutes: draft.reminder_offset_minutes,
            version: 0,
        }
    }

    /// Is this task shared with the whole family (no pre-assignment)?
    pub fn is_shared(&self) -> bool {
        self.assigned_to.is_none()
    }

    /// Does the rule route completion around parental review?
    pub fn auto_completes(&self) -> bool {
        self.repeat.map(|r| r.auto_complete).unwrap_or(false)
    }

    /// Mark as claimed by `member`.
    pub fn claim_by(&mut self, member: MemberRef, now: DateTime<Utc>) {
        self.status = TaskStatus::Claimed;
        self.claimed_by = Some(member);
        self.accepted_at = Some(now);
    }

    /// Drop the claim and return to `Open` (unclaim / reject).
    pub fn release_claim(&mut self) {
        self.status = TaskStatus::Open;
        self.claimed_by = None;
        self.accepted_at = None;
    }

    /// Move to `Review`, awaiting parental approval.
    pub fn mark_review(&mut self) {
        self.status = TaskStatus::Review;
    }

    /// Terminal completion (non-recurring path).
    pub fn mark_done(&mut self, now: DateTime<Utc>) {
        self.status = TaskStatus::Done;
        self.completed_at = Some(now);
    }

    /// Reassignment: always restarts the workflow from `Open`.
    pub fn assign_to(&mut self, target: Option<MemberRef>) {
        self.assigned_to = target;
        self.claimed_by = None;
        self.accepted_at = None;
        self.completed_at = None;
        self.status = TaskStatus::Open;
    }

    /// Reopen for the next recurrence cycle. Pre-assignment survives.
    pub fn reopen_with_due(&mut self, next_due: DateTime<Utc>) {
        self.status = TaskStatus::Open;
        self.claimed_by = None;
        self.accepted_at = None;
        self.completed_at = None;
        self.due_at = Some(next_due);
    }

    /// Check the record-level invariants. Transition methods cannot break
    /// them; rows arriving from loosely-typed storage can.
    pub fn invariants_hold(&self) -> bool {
        let claim_matches = match self.status {
            TaskStatus::Claimed => self.claimed_by.is_some(),
            TaskStatus::Open => self.claimed_by.is_none(),
            _ => true,
        };
        let done_complete = match self.status {
            TaskStatus::Done => self.completed_at.is_some_and(|c| c >= self.created_at),
            _ => true,
        };
        let no_auto_review = !(self.status == TaskStatus::Review && self.auto_completes());
        claim_matches && done_complete && no_auto_review
    }
}

/// Creation input for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,

    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,

    /// Pre-assignment; only a parent may set this.
    #[serde(default)]
    pub assigned_to: Option<MemberId>,

    #[serde(default)]
    pub repeat: Option<RepeatRule>,

    #[serde(default)]
    pub reminder_offset_minutes: Option<u32>,
}

impl TaskDraft {
    /// Convenience constructor for simple "one chore" use cases.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due_at: None,
            assigned_to: None,
            repeat: None,
            reminder_offset_minutes: None,
        }
    }

    pub fn due(mut self, at: DateTime<Utc>) -> Self {
        self.due_at = Some(at);
        self
    }

    pub fn assigned(mut self, member: MemberId) -> Self {
        self.assigned_to = Some(member);
        self
    }

    pub fn repeating(mut self, rule: RepeatRule) -> Self {
        self.repeat = Some(rule);
        self
    }

    pub fn remind_before(mut self, minutes: u32) -> Self {
        self.reminder_offset_minutes = Some(minutes);
        self
    }

    /// Reject malformed input before any state change.
    pub fn validate(&self) -> Result<(), EngineError> {
        validate_title(&self.title)?;
        if let Some(rule) = &self.repeat
            && rule.interval_days == 0
        {
            return Err(EngineError::invalid("repeat interval must be positive"));
        }
        validate_reminder(self.reminder_offset_minutes, self.due_at)?;
        Ok(())
    }
}

/// Field updates for `edit`. `None` leaves a field untouched; the inner
/// `Option` distinguishes "set" from "clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub due_at: Option<Option<DateTime<Utc>>>,
    pub repeat: Option<Option<RepeatRule>>,
    pub reminder_offset_minutes: Option<Option<u32>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn retitle(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn set_due(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.due_at = Some(at);
        self
    }

    pub fn set_repeat(mut self, rule: Option<RepeatRule>) -> Self {
        self.repeat = Some(rule);
        self
    }

    pub fn set_reminder(mut self, minutes: Option<u32>) -> Self {
        self.reminder_offset_minutes = Some(minutes);
        self
    }

    /// Apply to a record, validating the resulting shape. Status is never
    /// touched here — whether the edit is allowed at all is the engine's
    /// call.
    pub fn apply(&self, task: &mut TaskRecord) -> Result<(), EngineError> {
        let title = self.title.clone().unwrap_or_else(|| task.title.clone());
        validate_title(&title)?;

        let due_at = self.due_at.unwrap_or(task.due_at);
        let reminder = self
            .reminder_offset_minutes
            .unwrap_or(task.reminder_offset_minutes);
        validate_reminder(reminder, due_at)?;

        if let Some(Some(rule)) = self.repeat
            && rule.interval_days == 0
        {
            return Err(EngineError::invalid("repeat interval must be positive"));
        }
        // An auto-completing rule never sits in review; attaching one to a
        // task already awaiting approval would break that the moment the
        // patch lands.
        if let Some(Some(rule)) = self.repeat
            && rule.auto_complete
            && task.status == TaskStatus::Review
        {
            return Err(EngineError::invalid(
                "cannot attach an auto-completing rule while the task awaits review",
            ));
        }

        task.title = title;
        task.due_at = due_at;
        task.reminder_offset_minutes = reminder;
        if let Some(repeat) = self.repeat {
            task.repeat = repeat;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), EngineError> {
    if title.trim().is_empty() {
        return Err(EngineError::invalid("title must not be empty"));
    }
    Ok(())
}

fn validate_reminder(
    offset: Option<u32>,
    due_at: Option<DateTime<Utc>>,
) -> Result<(), EngineError> {
    let Some(minutes) = offset else {
        return Ok(());
    };
    if !REMINDER_OFFSETS_MINUTES.contains(&minutes) {
        return Err(EngineError::invalid(format!(
            "reminder offset must be one of {REMINDER_OFFSETS_MINUTES:?} minutes, got {minutes}"
        )));
    }
    if due_at.is_none() {
        return Err(EngineError::invalid(
            "a reminder offset needs a due date to count back from",
        ));
    }
    Ok(())
}
