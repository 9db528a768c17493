//! Notifier port - reminder/assignment fan-out.
//!
//! Fire-and-forget: the engine emits intents and moves on. At-least-once
//! delivery downstream is acceptable, so there is no result to propagate and
//! a lost notification never fails a transition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{MemberId, TaskId};

#[async_trait]
pub trait Notifier: Send + Sync {
    /// A task was assigned (or reassigned) to `to`.
    async fn task_assigned(&self, task_id: TaskId, to: MemberId, title: &str);

    /// `to`'s task enters its reminder window. Emission only — the timer
    /// that decides *when* to call this is an external concern.
    async fn task_due_soon(&self, task_id: TaskId, to: MemberId, title: &str, due_at: DateTime<Utc>);
}

/// Default notifier: drops everything (notifications are optional).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn task_assigned(&self, _task_id: TaskId, _to: MemberId, _title: &str) {}

    async fn task_due_soon(
        &self,
        _task_id: TaskId,
        _to: MemberId,
        _title: &str,
        _due_at: DateTime<Utc>,
    ) {
    }
}
