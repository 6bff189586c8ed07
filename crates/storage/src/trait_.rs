//! Storage trait abstraction.

use async_trait::async_trait;
use crewplan_core::{Task, Worker};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Key of the worker collection.
pub const TEAM_KEY: &str = "team";

/// Key of the task collection.
pub const TASKS_KEY: &str = "tasks";

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for roster data.
///
/// Workers and tasks are kept as two independent collections, each
/// addressed by a fixed key ([`TEAM_KEY`], [`TASKS_KEY`]). A collection that
/// has never been saved loads as empty.
///
/// Saves are staged: the same handle reads its staged collections back, but
/// they only become durable on [`Storage::commit`], which installs every
/// staged collection together. [`Storage::rollback`] drops them and leaves
/// the last committed pair in place.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Collections ===

    /// Load all workers.
    async fn load_workers(&self) -> Result<Vec<Worker>>;

    /// Replace the worker collection.
    async fn save_workers(&mut self, workers: &[Worker]) -> Result<()>;

    /// Load all tasks.
    async fn load_tasks(&self) -> Result<Vec<Task>>;

    /// Replace the task collection.
    async fn save_tasks(&mut self, tasks: &[Task]) -> Result<()>;

    // === Transaction support ===

    /// Install all staged collections, recording a message.
    async fn commit(&mut self, message: &str) -> Result<()>;

    /// Discard all staged collections.
    async fn rollback(&mut self) -> Result<()>;
}
