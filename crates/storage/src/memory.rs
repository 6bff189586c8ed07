//! In-memory storage, for tests and throwaway sessions.

use async_trait::async_trait;
use crewplan_core::{Task, Worker};
use super::{Result, Storage};

/// Storage backend that keeps both collections in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    workers: Vec<Worker>,
    tasks: Vec<Task>,
    staged_workers: Option<Vec<Worker>>,
    staged_tasks: Option<Vec<Task>>,
    commits: Vec<String>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-filled with committed collections.
    pub fn with_data(workers: Vec<Worker>, tasks: Vec<Task>) -> Self {
        Self { workers, tasks, ..Self::default() }
    }

    /// Messages of all commits so far, oldest first.
    pub fn commits(&self) -> &[String] {
        &self.commits
    }

    /// Whether there are saves not yet committed.
    pub fn is_pending(&self) -> bool {
        self.staged_workers.is_some() || self.staged_tasks.is_some()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load_workers(&self) -> Result<Vec<Worker>> {
        Ok(self.staged_workers.as_ref().unwrap_or(&self.workers).clone())
    }

    async fn save_workers(&mut self, workers: &[Worker]) -> Result<()> {
        self.staged_workers = Some(workers.to_vec());
        Ok(())
    }

    async fn load_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.staged_tasks.as_ref().unwrap_or(&self.tasks).clone())
    }

    async fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        self.staged_tasks = Some(tasks.to_vec());
        Ok(())
    }

    async fn commit(&mut self, message: &str) -> Result<()> {
        if let Some(workers) = self.staged_workers.take() {
            self.workers = workers;
        }
        if let Some(tasks) = self.staged_tasks.take() {
            self.tasks = tasks;
        }
        self.commits.push(message.to_string());
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.staged_workers = None;
        self.staged_tasks = None;
        Ok(())
    }
}
