//! Raw-row adapter: normalizes loosely-typed store rows into `TaskRecord`.
//!
//! The historical backend wrote rows with drifting key names (a due instant
//! may arrive as `dueAt`, `due_time`, or `due`), timestamps as epoch seconds,
//! epoch millis or RFC 3339 strings, and a sentinel assignee ("all" /
//! "family" / "") meaning "shared". All of that variability stops here; the
//! engine only ever sees the strict `TaskRecord` shape.
//!
//! Read-side policy is to degrade gracefully: fields that merely *decorate* a
//! task (repeat rule, reminder offset, stale claimant) are dropped when
//! malformed, while fields the workflow depends on (ids, title, status) fail
//! the row with a `RowError`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{
    FamilyId, MemberId, MemberRef, RepeatRule, TaskId, TaskRecord, TaskStatus,
    REMINDER_OFFSETS_MINUTES,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("row is not a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` holds an unparseable id")]
    BadId(&'static str),

    #[error("unrecognized status `{0}`")]
    BadStatus(String),

    #[error("field `{0}` holds an unparseable timestamp")]
    BadTimestamp(&'static str),
}

/// A persisted row as it actually looks, aliases and all.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTaskRow {
    #[serde(alias = "taskId", alias = "task_id", alias = "_id")]
    pub id: String,

    #[serde(alias = "familyId", alias = "family")]
    pub family_id: String,

    #[serde(alias = "name")]
    pub title: String,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(
        default,
        alias = "dueAt",
        alias = "dueTime",
        alias = "due_time",
        alias = "due"
    )]
    pub due_at: Option<RawInstant>,

    #[serde(default, alias = "createdAt", alias = "created")]
    pub created_at: Option<RawInstant>,

    #[serde(default, alias = "completedAt", alias = "completed")]
    pub completed_at: Option<RawInstant>,

    #[serde(default, alias = "acceptedAt", alias = "accepted")]
    pub accepted_at: Option<RawInstant>,

    #[serde(alias = "createdById", alias = "creator")]
    pub created_by: String,

    #[serde(default, alias = "assignedToId", alias = "assignee")]
    pub assigned_to_id: Option<String>,

    #[serde(default, alias = "assignedToName", alias = "assigneeName")]
    pub assigned_to_name: Option<String>,

    #[serde(default, alias = "claimedById")]
    pub claimed_by_id: Option<String>,

    #[serde(default, alias = "claimedByName")]
    pub claimed_by_name: Option<String>,

    #[serde(default, alias = "repeatRule", alias = "repeat_rule")]
    pub repeat: Option<Value>,

    #[serde(default, alias = "reminderOffsetMinutes", alias = "reminder")]
    pub reminder_offset_minutes: Option<i64>,

    #[serde(default, alias = "rev", alias = "_v")]
    pub version: Option<u64>,
}

/// A timestamp however the backend chose to write it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawInstant {
    Epoch(i64),
    Text(String),
}

impl RawInstant {
    /// Epoch values below ~1e11 are seconds, above are milliseconds
    /// (1e11 seconds is year 5138; 1e11 millis is 1973 — the ranges do not
    /// overlap for any plausible chore).
    fn resolve(&self, field: &'static str) -> Result<DateTime<Utc>, RowError> {
        match self {
            RawInstant::Epoch(n) => {
                let millis = if n.abs() < 100_000_000_000 { n * 1000 } else { *n };
                DateTime::from_timestamp_millis(millis).ok_or(RowError::BadTimestamp(field))
            }
            RawInstant::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| RowError::BadTimestamp(field)),
        }
    }
}

impl RawTaskRow {
    pub fn from_value(value: Value) -> Result<Self, RowError> {
        if !value.is_object() {
            return Err(RowError::NotAnObject);
        }
        serde_json::from_value(value).map_err(|_| RowError::MissingField("id/family_id/title"))
    }

    /// Produce the strict record the engine works with.
    pub fn normalize(self) -> Result<TaskRecord, RowError> {
        let id = TaskId::parse(&self.id).map_err(|_| RowError::BadId("id"))?;
        let family_id =
            FamilyId::parse(&self.family_id).map_err(|_| RowError::BadId("family_id"))?;
        let created_by =
            MemberId::parse(&self.created_by).map_err(|_| RowError::BadId("created_by"))?;

        let status = parse_status(self.status.as_deref())?;
        let due_at = resolve_opt(&self.due_at, "due_at")?;
        let completed_at = resolve_opt(&self.completed_at, "completed_at")?;
        let accepted_at = resolve_opt(&self.accepted_at, "accepted_at")?;

        // Rows predating the created_at column sort after everything else.
        let created_at = match &self.created_at {
            Some(raw) => raw.resolve("created_at")?,
            None => DateTime::UNIX_EPOCH,
        };

        let assigned_to = member_ref(
            self.assigned_to_id.as_deref(),
            self.assigned_to_name.as_deref(),
        );
        let claimed_by = member_ref(
            self.claimed_by_id.as_deref(),
            self.claimed_by_name.as_deref(),
        );

        let repeat = self.repeat.as_ref().and_then(RepeatRule::decode);

        let reminder_offset_minutes = self
            .reminder_offset_minutes
            .and_then(|m| u32::try_from(m).ok())
            .filter(|m| REMINDER_OFFSETS_MINUTES.contains(m))
            .filter(|_| due_at.is_some());

        let mut task = TaskRecord {
            id,
            family_id,
            title: self.title,
            status,
            due_at,
            created_at,
            completed_at,
            accepted_at,
            created_by,
            assigned_to,
            claimed_by,
            repeat,
            reminder_offset_minutes,
            version: self.version.unwrap_or(0),
        };
        repair(&mut task);
        Ok(task)
    }
}

fn resolve_opt(
    raw: &Option<RawInstant>,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, RowError> {
    raw.as_ref().map(|r| r.resolve(field)).transpose()
}

fn parse_status(raw: Option<&str>) -> Result<TaskStatus, RowError> {
    let Some(raw) = raw else {
        return Ok(TaskStatus::Open);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "open" | "pending" | "todo" => Ok(TaskStatus::Open),
        "claimed" | "in_progress" => Ok(TaskStatus::Claimed),
        "review" | "awaiting_approval" => Ok(TaskStatus::Review),
        "done" | "completed" => Ok(TaskStatus::Done),
        other => Err(RowError::BadStatus(other.to_string())),
    }
}

/// Sentinel assignees ("all", "family", empty) mean "shared": no assignee.
/// An unparseable member id is treated the same way rather than failing the
/// row — hiding a task is worse than showing it as shared.
fn member_ref(id: Option<&str>, name: Option<&str>) -> Option<MemberRef> {
    let id = id?.trim();
    if id.is_empty() || id.eq_ignore_ascii_case("all") || id.eq_ignore_ascii_case("family") {
        return None;
    }
    let id = MemberId::parse(id).ok()?;
    Some(MemberRef::new(id, name.unwrap_or_default()))
}

/// Restore the record invariants a loosely-typed row may have broken.
/// Status is authoritative; claim fields follow it.
fn repair(task: &mut TaskRecord) {
    match task.status {
        TaskStatus::Open if task.claimed_by.is_some() => {
            task.claimed_by = None;
            task.accepted_at = None;
        }
        TaskStatus::Claimed if task.claimed_by.is_none() => {
            task.status = TaskStatus::Open;
            task.accepted_at = None;
        }
        TaskStatus::Done if task.completed_at.is_none() => {
            task.completed_at = Some(task.created_at);
        }
        // An auto-completing rule never sits in review; the stale rule is
        // the decoration, the status is the workflow truth.
        TaskStatus::Review if task.auto_completes() => {
            task.repeat = None;
        }
        _ => {}
    }
}
