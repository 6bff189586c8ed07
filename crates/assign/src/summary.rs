//! Progress summary of a roster.

use serde::Serialize;
use crewplan_core::{Task, Worker, WorkerId};

/// Counts describing how far along the project is and how well the open
/// work is distributed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of tasks
    pub total: usize,
    /// Completed tasks
    pub completed: usize,
    /// Tasks with a worker set, completed or not
    pub assigned: usize,
    /// Open tasks without a worker
    pub unassigned: usize,
    /// Every task is either assigned or completed (and there is at least one)
    pub all_distributed: bool,
    /// Workers holding more open tasks than their capacity
    pub over_capacity: Vec<WorkerId>,
}

impl Summary {
    /// Summarize the given collections.
    pub fn of(workers: &[Worker], tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        let assigned = tasks.iter().filter(|t| t.assigned_to.is_some()).count();
        let unassigned = tasks
            .iter()
            .filter(|t| !t.completed && t.assigned_to.is_none())
            .count();

        Self {
            total: tasks.len(),
            completed,
            assigned,
            unassigned,
            all_distributed: !tasks.is_empty() && unassigned == 0,
            over_capacity: workers
                .iter()
                .filter(|w| w.is_over_capacity())
                .map(|w| w.id)
                .collect(),
        }
    }

    /// Completed share of all tasks, in percent.
    pub fn percent_complete(&self) -> f32 {
        if self.total > 0 {
            (self.completed as f32 / self.total as f32) * 100.0
        } else {
            0.0
        }
    }

    /// Tasks grouped by the worker holding them, in worker order.
    ///
    /// Completed tasks stay with their last worker. Workers without tasks
    /// are skipped.
    pub fn by_worker<'a>(workers: &'a [Worker], tasks: &'a [Task]) -> Vec<(&'a Worker, Vec<&'a Task>)> {
        workers
            .iter()
            .map(|w| {
                let held: Vec<&Task> = tasks.iter().filter(|t| t.assigned_to == Some(w.id)).collect();
                (w, held)
            })
            .filter(|(_, held)| !held.is_empty())
            .collect()
    }
}
