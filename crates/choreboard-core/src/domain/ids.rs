//! Domain identifiers (strongly-typed IDs).
//!
//! ULID-based IDs with a phantom-type marker so a `TaskId` can never be
//! handed to an API expecting a `MemberId`. ULIDs sort by creation time,
//! which the resolver relies on for deterministic tie-breaking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// Marker trait for each ID type.
///
/// Provides the prefix used by `Display` ("task-", "member-", "family-").
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Generic ID type.
///
/// `T` is `PhantomData`: zero bytes at runtime, a distinct type at compile
/// time.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }

    /// Parse from a string, accepting both the bare ULID and the prefixed
    /// display form ("task-01H...").
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        let bare = s.strip_prefix(T::prefix()).unwrap_or(s);
        Ulid::from_string(bare).map(Self::from_ulid)
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Marker type for tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {}

impl IdMarker for Task {
    fn prefix() -> &'static str {
        "task-"
    }
}

/// Marker type for family members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Member {}

impl IdMarker for Member {
    fn prefix() -> &'static str {
        "member-"
    }
}

/// Marker type for families (the tenant scope sharing one task list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {}

impl IdMarker for Family {
    fn prefix() -> &'static str {
        "family-"
    }
}

/// Identifier of a task (one chore instance).
pub type TaskId = Id<Task>;

/// Identifier of a family member.
pub type MemberId = Id<Member>;

/// Identifier of a family.
pub type FamilyId = Id<Family>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let u1 = Ulid::new();
        let u2 = Ulid::new();

        let task = TaskId::from_ulid(u1);
        let member = MemberId::from_ulid(u2);

        assert_eq!(task.as_ulid(), u1);
        assert_eq!(member.as_ulid(), u2);

        assert!(task.to_string().starts_with("task-"));
        assert!(member.to_string().starts_with("member-"));

        // The whole point: you can't accidentally mix these types.
        // let _: TaskId = member; // <- does not compile
    }

    #[test]
    fn ids_sort_by_creation_time() {
        let id1 = TaskId::from_ulid(Ulid::new());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = TaskId::from_ulid(Ulid::new());

        assert!(id1 < id2);
    }

    #[test]
    fn id_serializes_as_bare_ulid_string() {
        let ulid = Ulid::new();
        let id = TaskId::from_ulid(ulid);

        let s = serde_json::to_string(&id).unwrap();
        assert_eq!(s, format!("\"{ulid}\""));

        let back: TaskId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn parse_accepts_prefixed_and_bare_forms() {
        let id = FamilyId::from_ulid(Ulid::new());

        let bare = id.as_ulid().to_string();
        let prefixed = id.to_string();

        assert_eq!(FamilyId::parse(&bare).unwrap(), id);
        assert_eq!(FamilyId::parse(&prefixed).unwrap(), id);
        assert!(FamilyId::parse("not-a-ulid").is_err());
    }

    #[test]
    fn phantom_marker_is_free() {
        use std::mem::size_of;
        assert_eq!(size_of::<TaskId>(), size_of::<Ulid>());
        assert_eq!(size_of::<MemberId>(), size_of::<Ulid>());
        assert_eq!(size_of::<FamilyId>(), 16);
    }
}
