//! Lifecycle events handed to the notifier.
//!
//! The engine only *emits* these intents; scheduling the actual reminder
//! timer and delivering a push message are external concerns. At-least-once
//! delivery is acceptable, so events carry everything a notification needs
//! (no follow-up reads required).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{MemberId, TaskId};

/// An event visible outside the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A task was assigned (or reassigned) to a member.
    TaskAssigned {
        task_id: TaskId,
        to: MemberId,
        title: String,
    },

    /// A task's reminder window has opened.
    TaskDueSoon {
        task_id: TaskId,
        to: MemberId,
        title: String,
        due_at: DateTime<Utc>,
    },
}
