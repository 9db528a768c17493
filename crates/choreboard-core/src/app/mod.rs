//! App - アプリケーション層
//!
//! Combines the domain model with the ports:
//! - **engine**: the authoritative workflow state machine (claim / approve /
//!   assign / ...), committed through the store's conditional writes
//! - **recurrence**: due-date advancement for repeating tasks
//! - **resolver**: read-side visibility projections (mine / family / kids)
//! - **status**: per-status board counts

pub mod engine;
pub mod recurrence;
pub mod resolver;
pub mod status;

pub use self::engine::{EngineBuilder, WorkflowEngine};
pub use self::resolver::Scope;
pub use self::status::BoardCounts;
