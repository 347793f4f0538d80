// File: src/error.rs
//! Recoverable error kinds surfaced by the core.
//!
//! Operations that reference a task or history id which no longer exists are
//! deliberately *not* errors: they return `None` (or `Ok(None)`) and leave
//! the store untouched, so a stale id from a concurrent session degrades to
//! a no-op instead of a crash.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Rejected user input. The store is left exactly as it was.
    #[error("invalid task text: {0}")]
    Validation(String),

    /// Persisting or fetching state failed. In-memory state is kept; the
    /// caller surfaces the condition as a status flag and retries on the
    /// next mutation.
    #[error("sync failed: {0}")]
    Sync(String),
}
