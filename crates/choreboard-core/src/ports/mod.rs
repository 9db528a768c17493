//! Ports - 抽象化レイヤー
//!
//! Hexagonal architecture seams. Each trait fronts an external collaborator
//! (durable task storage, the family roster, push delivery, wall-clock time)
//! so the engine stays testable without any UI harness or real backend.

pub mod clock;
pub mod id_generator;
pub mod notifier;
pub mod roster;
pub mod task_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::notifier::{NoopNotifier, Notifier};
pub use self::roster::MemberDirectory;
pub use self::task_store::{StoreError, TaskStore};
