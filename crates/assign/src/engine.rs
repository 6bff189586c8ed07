//! Full re-assignment of a roster.
//!
//! The shipped strategy is a greedy single pass: tasks are visited by
//! priority (high first, input order within a priority) and each open task
//! goes to the best eligible worker at that moment. Earlier placements are
//! never revisited, so the result is not guaranteed to be maximal. Another
//! solver can be plugged in behind [`Assigner`] without touching callers.

use crewplan_core::{Task, Worker};
use tracing::debug;

use crate::eligibility::{eligible, match_score};

/// Result of a full assignment pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Workers in input order with recomputed workloads
    pub workers: Vec<Worker>,
    /// Tasks in input order with assignment decisions applied
    pub tasks: Vec<Task>,
}

impl Assignment {
    /// Open tasks that no worker could take.
    pub fn unassigned(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.completed && t.assigned_to.is_none())
    }

    /// Split into the two collections.
    pub fn into_parts(self) -> (Vec<Worker>, Vec<Task>) {
        (self.workers, self.tasks)
    }
}

/// Strategy that maps tasks onto workers.
///
/// Implementations must be deterministic, must leave completed tasks as they
/// are, and must not push any worker past its capacity.
pub trait Assigner: Send + Sync {
    /// Strategy name, for logs.
    fn name(&self) -> &'static str;

    /// Derive a complete assignment from scratch.
    fn assign(&self, workers: &[Worker], tasks: &[Task]) -> Assignment;
}

/// Greedy priority-first assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAssigner;

impl GreedyAssigner {
    /// Create a new greedy assigner.
    pub fn new() -> Self {
        Self
    }
}

impl Assigner for GreedyAssigner {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn assign(&self, workers: &[Worker], tasks: &[Task]) -> Assignment {
        let mut workers: Vec<Worker> = workers
            .iter()
            .cloned()
            .map(|mut w| {
                w.current_workload = 0;
                w
            })
            .collect();
        let mut tasks = tasks.to_vec();

        // Stable sort keeps input order within a priority
        let mut order: Vec<usize> = (0..tasks.len()).collect();
        order.sort_by(|&a, &b| tasks[b].priority.cmp(&tasks[a].priority));

        for idx in order {
            let task = &mut tasks[idx];
            if task.completed {
                continue;
            }

            task.assigned_to = match select(task, &workers) {
                Some(pick) => {
                    let worker = &mut workers[pick];
                    worker.current_workload += 1;
                    debug!(
                        "Assigned task {} ({}) to {} [{}/{}]",
                        task.id, task.priority, worker.name,
                        worker.current_workload, worker.workload_capacity,
                    );
                    Some(worker.id)
                }
                None => {
                    debug!("No eligible worker for task {} ({})", task.id, task.priority);
                    None
                }
            };
        }

        Assignment { workers, tasks }
    }
}

/// Pick the eligible worker with the highest match score, then the most
/// remaining capacity; the earliest worker wins a full tie.
fn select(task: &Task, workers: &[Worker]) -> Option<usize> {
    let mut best: Option<(usize, (usize, u32))> = None;

    for (idx, worker) in workers.iter().enumerate() {
        if !eligible(task, worker) {
            continue;
        }
        let key = (match_score(task, worker), worker.remaining_capacity());
        if best.map_or(true, |(_, best_key)| key > best_key) {
            best = Some((idx, key));
        }
    }

    best.map(|(idx, _)| idx)
}

/// Reassign every open task with the greedy strategy.
///
/// Returns the workers with fresh workloads and the tasks in their original
/// order. Never fails; empty inputs are fine.
pub fn assign_all(workers: &[Worker], tasks: &[Task]) -> (Vec<Worker>, Vec<Task>) {
    GreedyAssigner.assign(workers, tasks).into_parts()
}
