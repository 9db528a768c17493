//! In-memory task store.
//!
//! Design:
//! - One `tokio::sync::Mutex` around the whole map; every read-check-write
//!   happens inside a single lock scope, which is what makes the version
//!   check an atomic compare-and-swap.
//! - No await while holding the lock.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{FamilyId, TaskId, TaskRecord};
use crate::ports::{StoreError, TaskStore};

/// In-memory `TaskStore` for tests and the demo binary.
#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<Mutex<HashMap<TaskId, TaskRecord>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing the engine (test setup only).
    pub async fn seed(&self, task: TaskRecord) {
        self.tasks.lock().await.insert(task.id, task);
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, task: TaskRecord) -> Result<(), StoreError> {
        let mut tasks = self.tasks.lock().await;
        if tasks.contains_key(&task.id) {
            return Err(StoreError::Duplicate);
        }
        tasks.insert(task.id, task);
        Ok(())
    }

    async fn get(&self, family: FamilyId, id: TaskId) -> Result<TaskRecord, StoreError> {
        let tasks = self.tasks.lock().await;
        tasks
            .get(&id)
            .filter(|t| t.family_id == family)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, mut next: TaskRecord) -> Result<TaskRecord, StoreError> {
        let mut tasks = self.tasks.lock().await;
        let stored = tasks.get_mut(&next.id).ok_or(StoreError::NotFound)?;
        if stored.family_id != next.family_id {
            return Err(StoreError::NotFound);
        }
        if stored.version != next.version {
            return Err(StoreError::Conflict);
        }
        next.version += 1;
        *stored = next.clone();
        Ok(next)
    }

    async fn delete(&self, family: FamilyId, id: TaskId) -> Result<(), StoreError> {
        let mut tasks = self.tasks.lock().await;
        match tasks.get(&id) {
            Some(t) if t.family_id == family => {
                tasks.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }

    async fn list_by_family(&self, family: FamilyId) -> Vec<TaskRecord> {
        let tasks = self.tasks.lock().await;
        tasks
            .values()
            .filter(|t| t.family_id == family)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MemberId, TaskDraft};
    use chrono::{TimeZone, Utc};
    use ulid::Ulid;

    fn task(family: FamilyId) -> TaskRecord {
        TaskRecord::from_draft(
            TaskId::from_ulid(Ulid::new()),
            family,
            MemberId::from_ulid(Ulid::new()),
            None,
            TaskDraft::new("dishes"),
            Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn insert_get_round_trip_is_family_scoped() {
        let store = InMemoryTaskStore::new();
        let family = FamilyId::from_ulid(Ulid::new());
        let other = FamilyId::from_ulid(Ulid::new());
        let t = task(family);

        store.insert(t.clone()).await.unwrap();
        assert_eq!(store.get(family, t.id).await.unwrap(), t);
        assert_eq!(store.get(other, t.id).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn double_insert_is_rejected() {
        let store = InMemoryTaskStore::new();
        let t = task(FamilyId::from_ulid(Ulid::new()));

        store.insert(t.clone()).await.unwrap();
        assert_eq!(store.insert(t).await, Err(StoreError::Duplicate));
    }

    #[tokio::test]
    async fn update_bumps_version_and_detects_stale_writers() {
        let store = InMemoryTaskStore::new();
        let family = FamilyId::from_ulid(Ulid::new());
        let t = task(family);
        store.insert(t.clone()).await.unwrap();

        // Two writers read the same version.
        let read_a = store.get(family, t.id).await.unwrap();
        let read_b = store.get(family, t.id).await.unwrap();

        let mut next_a = read_a;
        next_a.title = "dishes (A)".to_string();
        let winner = store.update(next_a).await.unwrap();
        assert_eq!(winner.version, 1);

        let mut next_b = read_b;
        next_b.title = "dishes (B)".to_string();
        assert_eq!(store.update(next_b).await, Err(StoreError::Conflict));

        // The losing write left no trace.
        let current = store.get(family, t.id).await.unwrap();
        assert_eq!(current.title, "dishes (A)");
    }

    #[tokio::test]
    async fn update_rejects_cross_family_writes() {
        let store = InMemoryTaskStore::new();
        let family = FamilyId::from_ulid(Ulid::new());
        let t = task(family);
        store.insert(t.clone()).await.unwrap();

        let mut cross = t.clone();
        cross.family_id = FamilyId::from_ulid(Ulid::new());
        assert_eq!(store.update(cross).await, Err(StoreError::NotFound));

        // The in-family writer is unaffected.
        let updated = store.update(t).await.unwrap();
        assert_eq!(updated.version, 1);
    }

    #[tokio::test]
    async fn delete_is_hard_and_family_scoped() {
        let store = InMemoryTaskStore::new();
        let family = FamilyId::from_ulid(Ulid::new());
        let other = FamilyId::from_ulid(Ulid::new());
        let t = task(family);
        store.insert(t.clone()).await.unwrap();

        assert_eq!(store.delete(other, t.id).await, Err(StoreError::NotFound));
        store.delete(family, t.id).await.unwrap();
        assert_eq!(store.get(family, t.id).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn list_by_family_filters_tenants() {
        let store = InMemoryTaskStore::new();
        let family = FamilyId::from_ulid(Ulid::new());
        let other = FamilyId::from_ulid(Ulid::new());
        store.insert(task(family)).await.unwrap();
        store.insert(task(family)).await.unwrap();
        store.insert(task(other)).await.unwrap();

        assert_eq!(store.list_by_family(family).await.len(), 2);
        assert_eq!(store.list_by_family(other).await.len(), 1);
    }
}
