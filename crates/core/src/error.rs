//! Error types for roster operations.

use crate::id::{TaskId, WorkerId};

/// Result type for roster operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by roster operations.
///
/// The pure operations over well-typed collections never fail; only a
/// reference to an entity that does not exist is reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No task with this id in the given collection
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// No worker with this id in the given collection
    #[error("Worker not found: {0}")]
    WorkerNotFound(WorkerId),

    /// Generated project payload could not be parsed
    #[error("Invalid project draft: {0}")]
    InvalidDraft(String),

    /// A string that should be an id is not one
    #[error("Invalid id: {0}")]
    InvalidId(String),
}

impl Error {
    /// Whether this error reports a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::TaskNotFound(_) | Error::WorkerNotFound(_))
    }
}
