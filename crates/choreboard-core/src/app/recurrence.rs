//! Recurrence scheduler: computes the next cycle of a repeating task.
//!
//! Pure date math, no I/O. The engine calls `roll_over` from `approve` and
//! `auto_complete`; whether review was required first is decided there, not
//! here.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{RepeatRule, TaskRecord};

/// Next due instant for a completed cycle.
///
/// Baseline is the task's due date, or the completion instant when the task
/// had none ("anytime" chores recur relative to when they actually get
/// done). Whole-day addition preserves the baseline's time-of-day, so a
/// 16:30 chore stays a 16:30 chore.
pub fn next_due(
    due_at: Option<DateTime<Utc>>,
    rule: RepeatRule,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let baseline = due_at.unwrap_or(now);
    baseline + Duration::days(i64::from(rule.interval_days))
}

/// Reopen `task` as the next cycle of the same record.
///
/// Claimant, acceptance and completion are cleared; pre-assignment survives
/// (the same kid keeps the same chore). The record keeps its identity — this
/// is a rollover, not a new task.
pub fn roll_over(task: &mut TaskRecord, rule: RepeatRule, now: DateTime<Utc>) {
    let next = next_due(task.due_at, rule, now);
    task.reopen_with_due(next);
}
