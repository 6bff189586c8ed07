//! Roster - the entity store holding the current workers and tasks.
//!
//! The roster is plain data with CRUD operations. It never decides
//! assignments; matching and workload recalculation live in the
//! assignment layer and hand back new collections that are installed
//! with [`Roster::replace`].

use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::id::{TaskId, WorkerId};
use crate::task::{Priority, Task, TaskPatch};
use crate::worker::{Worker, WorkerPatch};

/// Current workers and tasks of one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    workers: Vec<Worker>,
    tasks: Vec<Task>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from existing collections.
    pub fn from_parts(workers: Vec<Worker>, tasks: Vec<Task>) -> Self {
        Self { workers, tasks }
    }

    /// Split into the two collections.
    pub fn into_parts(self) -> (Vec<Worker>, Vec<Task>) {
        (self.workers, self.tasks)
    }

    /// All workers in insertion order.
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a worker.
    pub fn worker(&self, id: WorkerId) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    /// Look up a task.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Install a new pair of collections.
    pub fn replace(&mut self, workers: Vec<Worker>, tasks: Vec<Task>) {
        self.workers = workers;
        self.tasks = tasks;
    }

    // === Workers ===

    /// Append a worker.
    pub fn add_worker(&mut self, worker: Worker) -> WorkerId {
        let id = worker.id;
        self.workers.push(worker);
        id
    }

    /// Update a worker in place.
    pub fn update_worker(&mut self, id: WorkerId, patch: WorkerPatch) -> Result<&Worker> {
        let worker = self
            .workers
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(Error::WorkerNotFound(id))?;
        worker.apply(patch);
        Ok(&*worker)
    }

    /// Remove a worker and unassign every task it held.
    ///
    /// Completion flags are left as they are.
    pub fn remove_worker(&mut self, id: WorkerId) -> Result<Worker> {
        let pos = self
            .workers
            .iter()
            .position(|w| w.id == id)
            .ok_or(Error::WorkerNotFound(id))?;

        for task in self.tasks.iter_mut().filter(|t| t.assigned_to == Some(id)) {
            task.assigned_to = None;
        }

        Ok(self.workers.remove(pos))
    }

    // === Tasks ===

    /// Append a task.
    pub fn add_task(&mut self, task: Task) -> TaskId {
        let id = task.id;
        self.tasks.push(task);
        id
    }

    /// Update a task in place.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> Result<&Task> {
        let task = self.task_mut(id)?;
        task.apply(patch);
        Ok(&*task)
    }

    /// Remove a task.
    pub fn remove_task(&mut self, id: TaskId) -> Result<Task> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        Ok(self.tasks.remove(pos))
    }

    /// Flip a task's completion flag, returning the new value.
    ///
    /// The assignment is retained either way.
    pub fn toggle_completion(&mut self, id: TaskId) -> Result<bool> {
        let task = self.task_mut(id)?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    /// A small starter project used on first run.
    pub fn sample() -> Self {
        let workers = vec![
            Worker::new("Sarah Chen", "Frontend Developer", ["React", "TypeScript", "UI/UX"], 5),
            Worker::new("Marcus Johnson", "Backend Developer", ["Node.js", "Database", "API"], 4),
            Worker::new("Emily Rodriguez", "Full Stack Developer", ["React", "Node.js", "Database"], 6),
        ];
        let tasks = vec![
            Task::new(
                "Design Dashboard UI",
                "Create the main dashboard interface with modern design",
                ["React", "UI/UX"],
                Priority::High,
            ),
            Task::new(
                "Build REST API",
                "Develop the backend API endpoints",
                ["Node.js", "API"],
                Priority::High,
            ),
            Task::new(
                "Setup Database Schema",
                "Design and implement the database structure",
                ["Database"],
                Priority::Medium,
            ),
            Task::new(
                "Implement Authentication",
                "Add user login and registration",
                ["React", "Node.js"],
                Priority::High,
            ),
        ];
        Self::from_parts(workers, tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_with_assignments() -> (Roster, WorkerId, WorkerId) {
        let mut roster = Roster::new();
        let a = roster.add_worker(Worker::new("A", "Dev", ["React"], 2));
        let b = roster.add_worker(Worker::new("B", "Dev", ["Node"], 2));

        for (title, owner, completed) in [
            ("T1", Some(a), false),
            ("T2", Some(a), true),
            ("T3", Some(b), false),
            ("T4", None, false),
        ] {
            let mut task = Task::new(title, "", ["React"], Priority::Medium);
            task.assigned_to = owner;
            task.completed = completed;
            roster.add_task(task);
        }

        (roster, a, b)
    }

    #[test]
    fn test_remove_worker_cascades_to_its_tasks_only() {
        let (mut roster, a, b) = roster_with_assignments();
        let before: Vec<_> = roster.tasks().iter().map(|t| t.assigned_to).collect();

        let removed = roster.remove_worker(a).unwrap();
        assert_eq!(removed.name, "A");
        assert!(roster.worker(a).is_none());

        let after: Vec<_> = roster.tasks().iter().map(|t| t.assigned_to).collect();
        assert_eq!(after, vec![None, None, Some(b), None]);
        assert_eq!(before[2], after[2]);

        // Completion is not touched by the cascade
        assert!(roster.tasks()[1].completed);
        assert!(!roster.tasks()[0].completed);
    }

    #[test]
    fn test_unknown_ids_are_reported() {
        let (mut roster, _, _) = roster_with_assignments();
        let ghost_worker = WorkerId::new();
        let ghost_task = TaskId::new();
        let snapshot = roster.clone();

        assert_eq!(roster.remove_worker(ghost_worker), Err(Error::WorkerNotFound(ghost_worker)));
        assert_eq!(roster.remove_task(ghost_task), Err(Error::TaskNotFound(ghost_task)));
        assert_eq!(roster.toggle_completion(ghost_task), Err(Error::TaskNotFound(ghost_task)));
        assert!(roster.update_worker(ghost_worker, WorkerPatch::default()).is_err());
        assert!(roster.update_task(ghost_task, TaskPatch::default()).is_err());

        assert_eq!(roster, snapshot);
    }

    #[test]
    fn test_toggle_completion_keeps_assignment() {
        let (mut roster, a, _) = roster_with_assignments();
        let id = roster.tasks()[0].id;

        assert!(roster.toggle_completion(id).unwrap());
        assert_eq!(roster.task(id).unwrap().assigned_to, Some(a));

        assert!(!roster.toggle_completion(id).unwrap());
        assert_eq!(roster.task(id).unwrap().assigned_to, Some(a));
    }

    #[test]
    fn test_remove_task_has_no_cascade() {
        let (mut roster, a, _) = roster_with_assignments();
        let id = roster.tasks()[0].id;

        roster.remove_task(id).unwrap();
        assert_eq!(roster.tasks().len(), 3);
        assert!(roster.worker(a).is_some());
    }

    #[test]
    fn test_update_task_patch() {
        let (mut roster, _, _) = roster_with_assignments();
        let id = roster.tasks()[3].id;

        let task = roster
            .update_task(id, TaskPatch {
                priority: Some(Priority::High),
                title: Some("Renamed".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.assigned_to, None);
    }

    #[test]
    fn test_sample_roster() {
        let roster = Roster::sample();
        assert_eq!(roster.workers().len(), 3);
        assert_eq!(roster.tasks().len(), 4);
        assert!(roster.tasks().iter().all(|t| t.assigned_to.is_none() && !t.completed));
    }
}
