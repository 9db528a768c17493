//! Engine error taxonomy.

use thiserror::Error;

/// Errors surfaced by the workflow engine.
///
/// Every failed transition is returned typed — never logged and swallowed.
/// State-changing operations are all-or-nothing: on any error the stored
/// record is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The actor lacks permission for the requested transition (wrong actor,
    /// wrong role, or wrong current state). Never retried automatically.
    #[error("not allowed: {0}")]
    NotAllowed(String),

    /// The task changed between read and write (optimistic concurrency check
    /// failed). The caller should re-fetch and may retry against the new
    /// state; the engine does not auto-retry.
    #[error("conflict: task was modified concurrently")]
    Conflict,

    /// Malformed input, rejected before any state change.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced task or member does not exist in the family's scope.
    #[error("not found: {0}")]
    NotFound(String),
}

impl EngineError {
    pub fn not_allowed(reason: impl Into<String>) -> Self {
        Self::NotAllowed(reason.into())
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}
