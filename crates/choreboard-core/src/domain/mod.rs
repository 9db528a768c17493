//! Domain model (IDs, members, task records, recurrence rules, errors, events).

pub mod errors;
pub mod events;
pub mod ids;
pub mod member;
pub mod repeat;
pub mod status;
pub mod task;

pub use self::errors::EngineError;
pub use self::events::DomainEvent;
pub use self::ids::{FamilyId, MemberId, TaskId};
pub use self::member::{Member, Role};
pub use self::repeat::RepeatRule;
pub use self::status::TaskStatus;
pub use self::task::{MemberRef, TaskDraft, TaskPatch, TaskRecord, REMINDER_OFFSETS_MINUTES};
