//! Roster management service.
//!
//! Every operation runs one read-modify-persist cycle under the roster
//! lock: load both collections, apply a pure core operation, recompute
//! workloads, save both collections, commit. A failed operation saves
//! nothing.

use std::sync::Arc;

use crewplan_assign::{reassign, recompute_workloads, Assigner, GreedyAssigner, Summary};
use crewplan_core::{
    Error as RosterError, ProjectDraft, Roster, Task, TaskId, TaskPatch, Worker, WorkerId,
    WorkerPatch,
};
use crewplan_storage::{Storage, StorageError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Result type for work operations.
pub type Result<T> = std::result::Result<T, WorkError>;

/// Errors from roster management.
#[derive(Debug, thiserror::Error)]
pub enum WorkError {
    /// The operation referenced something that does not exist
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// Loading or saving failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl WorkError {
    /// Whether this error reports a missing task or worker.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WorkError::Roster(e) if e.is_not_found())
    }
}

/// Configuration for the roster manager.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Whether to commit storage after each operation.
    ///
    /// When off, saves stay staged until the caller commits through
    /// [`RosterManager::storage`]; a failed operation then rolls back every
    /// staged change, not only its own.
    pub auto_commit: bool,
    /// Run a full assignment right after importing a roster
    pub auto_assign_on_import: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            auto_commit: true,
            auto_assign_on_import: false,
        }
    }
}

/// Outcome of a manual reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reassignment {
    /// Task that was reassigned
    pub task_id: TaskId,
    /// Worker holding the task before
    pub previous: Option<WorkerId>,
    /// Worker holding the task now
    pub current: Option<WorkerId>,
}

impl Reassignment {
    /// Whether the assignment actually changed.
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Outcome of a full assignment pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignReport {
    /// Strategy that produced the assignment
    pub strategy: &'static str,
    /// Open tasks that received a worker
    pub placed: usize,
    /// Open tasks left without a worker
    pub unassigned: Vec<TaskId>,
}

/// Serializes all changes to one roster.
pub struct RosterManager<S: Storage> {
    storage: Arc<Mutex<S>>,
    assigner: Box<dyn Assigner>,
    config: ManagerConfig,
}

impl<S: Storage> RosterManager<S> {
    /// Create a manager using the greedy assigner.
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
            assigner: Box::new(GreedyAssigner::new()),
            config: ManagerConfig::default(),
        }
    }

    /// Set the assignment strategy.
    pub fn with_assigner(mut self, assigner: Box<dyn Assigner>) -> Self {
        self.assigner = assigner;
        self
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Shared handle to the underlying storage.
    pub fn storage(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.storage)
    }

    /// Current roster.
    pub async fn snapshot(&self) -> Result<Roster> {
        let storage = self.storage.lock().await;
        load(&*storage).await
    }

    /// Progress summary of the current roster.
    pub async fn summary(&self) -> Result<Summary> {
        let roster = self.snapshot().await?;
        Ok(Summary::of(roster.workers(), roster.tasks()))
    }

    // === Workers ===

    /// Add a worker.
    pub async fn add_worker(&self, worker: Worker) -> Result<Worker> {
        let id = worker.id;
        let (_, roster) = self
            .transact(&format!("Add worker {}", id), |roster| {
                roster.add_worker(worker);
                Ok(())
            })
            .await?;
        info!("Added worker {}", id);
        find_worker(&roster, id)
    }

    /// Update a worker's descriptive fields, skills or capacity.
    pub async fn update_worker(&self, id: WorkerId, patch: WorkerPatch) -> Result<Worker> {
        let (_, roster) = self
            .transact(&format!("Update worker {}", id), |roster| {
                roster.update_worker(id, patch)?;
                Ok(())
            })
            .await?;
        find_worker(&roster, id)
    }

    /// Remove a worker, unassigning its tasks.
    pub async fn remove_worker(&self, id: WorkerId) -> Result<Worker> {
        let (removed, _) = self
            .transact(&format!("Remove worker {}", id), |roster| {
                let released = roster.tasks().iter().filter(|t| t.assigned_to == Some(id)).count();
                let worker = roster.remove_worker(id)?;
                debug!("Released {} task(s) from {}", released, worker.name);
                Ok(worker)
            })
            .await?;
        info!("Removed worker {} ({})", removed.id, removed.name);
        Ok(removed)
    }

    // === Tasks ===

    /// Add a task.
    pub async fn add_task(&self, task: Task) -> Result<Task> {
        let id = task.id;
        let (_, roster) = self
            .transact(&format!("Add task {}", id), |roster| {
                roster.add_task(task);
                Ok(())
            })
            .await?;
        info!("Added task {}", id);
        find_task(&roster, id)
    }

    /// Update a task's descriptive fields, skills or priority.
    pub async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<Task> {
        let (_, roster) = self
            .transact(&format!("Update task {}", id), |roster| {
                roster.update_task(id, patch)?;
                Ok(())
            })
            .await?;
        find_task(&roster, id)
    }

    /// Remove a task.
    pub async fn remove_task(&self, id: TaskId) -> Result<Task> {
        let (removed, _) = self
            .transact(&format!("Remove task {}", id), |roster| Ok(roster.remove_task(id)?))
            .await?;
        info!("Removed task {} ({})", removed.id, removed.title);
        Ok(removed)
    }

    /// Flip a task's completion flag and return the new value.
    pub async fn toggle_completion(&self, id: TaskId) -> Result<bool> {
        let (completed, _) = self
            .transact(&format!("Toggle task {}", id), |roster| Ok(roster.toggle_completion(id)?))
            .await?;
        info!("Task {} marked {}", id, if completed { "completed" } else { "open" });
        Ok(completed)
    }

    // === Assignment ===

    /// Manually assign a task to a worker, or unassign it with `None`.
    ///
    /// No skill or capacity check is made; the worker only has to exist.
    pub async fn reassign(&self, task_id: TaskId, worker_id: Option<WorkerId>) -> Result<Reassignment> {
        let (outcome, roster) = self
            .transact(&format!("Reassign task {}", task_id), |roster| {
                if let Some(worker_id) = worker_id {
                    roster.worker(worker_id).ok_or(RosterError::WorkerNotFound(worker_id))?;
                }
                let previous = roster
                    .task(task_id)
                    .ok_or(RosterError::TaskNotFound(task_id))?
                    .assigned_to;

                let tasks = reassign(roster.tasks(), task_id, worker_id)?;
                let workers = roster.workers().to_vec();
                roster.replace(workers, tasks);

                Ok(Reassignment { task_id, previous, current: worker_id })
            })
            .await?;

        if !outcome.changed() {
            debug!("Task {} already held by {:?}", task_id, worker_id);
        }
        if let Some(worker) = worker_id.and_then(|id| roster.worker(id)) {
            if worker.is_over_capacity() {
                warn!(
                    "{} is over capacity after manual assignment ({}/{})",
                    worker.name, worker.current_workload, worker.workload_capacity,
                );
            }
        }
        Ok(outcome)
    }

    /// Reassign every open task from scratch.
    pub async fn assign_all(&self) -> Result<AssignReport> {
        let (report, _) = self
            .transact("Assign all tasks", |roster| Ok(self.run_assigner(roster)))
            .await?;
        info!(
            "Assignment ({}) placed {} task(s), {} unassigned",
            report.strategy, report.placed, report.unassigned.len(),
        );
        Ok(report)
    }

    /// Replace the whole roster.
    pub async fn import(&self, roster: Roster) -> Result<Roster> {
        let auto_assign = self.config.auto_assign_on_import;
        let (_, roster) = self
            .transact("Import roster", move |current| {
                let (workers, tasks) = roster.into_parts();
                current.replace(workers, tasks);
                if auto_assign {
                    self.run_assigner(current);
                }
                Ok(())
            })
            .await?;

        info!("Imported {} worker(s) and {} task(s)", roster.workers().len(), roster.tasks().len());
        Ok(roster)
    }

    /// Replace the whole roster with a generated project draft.
    pub async fn import_draft(&self, draft: ProjectDraft) -> Result<Roster> {
        self.import(draft.into_roster()).await
    }

    /// Fill an empty roster with the starter project.
    ///
    /// Returns `None` and changes nothing if the roster already has data.
    pub async fn seed_sample(&self) -> Result<Option<Roster>> {
        let (seeded, roster) = self
            .transact("Seed sample roster", |current| {
                if !current.workers().is_empty() || !current.tasks().is_empty() {
                    return Ok(false);
                }
                let (workers, tasks) = Roster::sample().into_parts();
                current.replace(workers, tasks);
                Ok(true)
            })
            .await?;

        if !seeded {
            return Ok(None);
        }
        info!("Seeded {} worker(s) and {} task(s)", roster.workers().len(), roster.tasks().len());
        Ok(Some(roster))
    }

    fn run_assigner(&self, roster: &mut Roster) -> AssignReport {
        let assignment = self.assigner.assign(roster.workers(), roster.tasks());
        let unassigned: Vec<TaskId> = assignment.unassigned().map(|t| t.id).collect();
        let placed = assignment
            .tasks
            .iter()
            .filter(|t| !t.completed && t.assigned_to.is_some())
            .count();

        let (workers, tasks) = assignment.into_parts();
        roster.replace(workers, tasks);

        AssignReport {
            strategy: self.assigner.name(),
            placed,
            unassigned,
        }
    }

    /// One locked read-modify-persist cycle.
    ///
    /// Returns the operation's output with the roster as persisted. If any
    /// save or the commit fails, staged changes are rolled back and the last
    /// committed pair stays in place.
    async fn transact<T, F>(&self, message: &str, op: F) -> Result<(T, Roster)>
    where
        F: FnOnce(&mut Roster) -> Result<T>,
    {
        let mut storage = self.storage.lock().await;
        let mut roster = load(&*storage).await?;

        let out = op(&mut roster)?;

        let (workers, tasks) = roster.into_parts();
        let workers = recompute_workloads(&tasks, &workers);

        if let Err(e) = persist(&mut *storage, &workers, &tasks, message, self.config.auto_commit).await {
            warn!("{} failed, rolling back: {}", message, e);
            if let Err(rollback) = storage.rollback().await {
                warn!("Rollback failed: {}", rollback);
            }
            return Err(e.into());
        }
        debug!("{}", message);

        Ok((out, Roster::from_parts(workers, tasks)))
    }
}

async fn load<S: Storage>(storage: &S) -> Result<Roster> {
    let workers = storage.load_workers().await?;
    let tasks = storage.load_tasks().await?;
    Ok(Roster::from_parts(workers, tasks))
}

async fn persist<S: Storage>(
    storage: &mut S,
    workers: &[Worker],
    tasks: &[Task],
    message: &str,
    commit: bool,
) -> std::result::Result<(), StorageError> {
    storage.save_workers(workers).await?;
    storage.save_tasks(tasks).await?;
    if commit {
        storage.commit(message).await?;
    }
    Ok(())
}

fn find_worker(roster: &Roster, id: WorkerId) -> Result<Worker> {
    Ok(roster.worker(id).cloned().ok_or(RosterError::WorkerNotFound(id))?)
}

fn find_task(roster: &Roster, id: TaskId) -> Result<Task> {
    Ok(roster.task(id).cloned().ok_or(RosterError::TaskNotFound(id))?)
}
