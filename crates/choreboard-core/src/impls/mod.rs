//! Implementations of the ports (in-memory adapters for tests and the demo
//! binary, plus the raw-row normalisation adapter for loosely-typed backends).

pub mod inmem_roster;
pub mod inmem_store;
pub mod recording_notifier;
pub mod row;

pub use self::inmem_roster::InMemoryRoster;
pub use self::inmem_store::InMemoryTaskStore;
pub use self::recording_notifier::RecordingNotifier;
pub use self::row::{RawTaskRow, RowError};
