//! Recording notifier: captures emitted events for tests and the demo binary.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DomainEvent, MemberId, TaskId};
use crate::ports::Notifier;

#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().expect("notifier lock poisoned").clone()
    }

    fn push(&self, event: DomainEvent) {
        self.events.lock().expect("notifier lock poisoned").push(event);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn task_assigned(&self, task_id: TaskId, to: MemberId, title: &str) {
        self.push(DomainEvent::TaskAssigned {
            task_id,
            to,
            title: title.to_string(),
        });
    }

    async fn task_due_soon(
        &self,
        task_id: TaskId,
        to: MemberId,
        title: &str,
        due_at: DateTime<Utc>,
    ) {
        self.push(DomainEvent::TaskDueSoon {
            task_id,
            to,
            title: title.to_string(),
            due_at,
        });
    }
}
