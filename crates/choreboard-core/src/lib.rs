//! choreboard-core
//!
//! Core building blocks for the choreboard engine: a household chore list
//! where tasks move through `open -> claimed -> review -> done`, parents
//! approve or reject finished work, and repeating chores reopen themselves
//! with an advanced due date.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, member, status, repeat, task, errors, events）
//! - **ports**: 抽象化レイヤー（TaskStore, MemberDirectory, Clock, Notifier, IdGenerator）
//! - **app**: アプリケーションロジック（engine, recurrence, resolver, status）
//! - **impls**: 実装（InMemoryTaskStore など開発・テスト用）
//!
//! The engine itself is a pure request/response state transformer: it owns no
//! threads and never blocks. Concurrent callers are serialized by the task
//! store's conditional (version-checked) writes, so the hard race — two family
//! members claiming the same task at the same instant — resolves to exactly
//! one winner and one `Conflict`.

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::engine::{EngineBuilder, WorkflowEngine};
pub use app::recurrence;
pub use app::resolver::{self, Scope};
pub use app::status::BoardCounts;
pub use domain::{
    DomainEvent, EngineError, FamilyId, Member, MemberId, MemberRef, RepeatRule, Role, TaskDraft,
    TaskId, TaskPatch, TaskRecord, TaskStatus,
};
