//! TaskStore port - durable persistence and multi-device fan-out.
//!
//! The store is the source of truth. Every state-changing transition is a
//! conditional write keyed on the record's `version`: the update applies only
//! if the stored version still matches, which is what makes two simultaneous
//! `claim` calls resolve to exactly one winner. Timestamps cross this
//! boundary as absolute instants (`DateTime<Utc>`), never wall-clock strings.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{FamilyId, TaskId, TaskRecord};

/// Failures the store can report. The engine maps these onto its own error
/// taxonomy (`Conflict` / `NotFound`); it never retries on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("task not found")]
    NotFound,

    /// The conditional write lost: stored version differs from the expected
    /// one. The caller must re-fetch.
    #[error("version conflict")]
    Conflict,

    #[error("task id already exists")]
    Duplicate,
}

/// Port over the task persistence backend.
///
/// This trait is the seam for swapping implementations: in-memory for tests
/// and the demo binary, a synced document store in production. Whether a
/// recurrence rollover additionally journals the completed cycle into a
/// history log is the implementation's business — the engine only requires
/// that exactly one open record with the computed due date results.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a fresh record (version 0). Fails on id collision.
    async fn insert(&self, task: TaskRecord) -> Result<(), StoreError>;

    /// Fetch one record, scoped to the family.
    async fn get(&self, family: FamilyId, id: TaskId) -> Result<TaskRecord, StoreError>;

    /// Conditional update: applies only if the stored version equals
    /// `next.version`, then bumps it. Returns the record as stored.
    async fn update(&self, next: TaskRecord) -> Result<TaskRecord, StoreError>;

    /// Hard delete; no tombstone.
    async fn delete(&self, family: FamilyId, id: TaskId) -> Result<(), StoreError>;

    /// All of a family's records, completed ones included.
    async fn list_by_family(&self, family: FamilyId) -> Vec<TaskRecord>;
}
