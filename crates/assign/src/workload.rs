//! Manual reassignment and workload recalculation.
//!
//! A manual reassignment bypasses eligibility entirely: it may hand a task
//! to a worker without the skill or beyond capacity. Workloads are then
//! rebuilt from the task list alone with [`recompute_workloads`], which must
//! run after every manual change and every completion toggle.

use std::collections::HashMap;

use crewplan_core::{Error, Result, Task, TaskId, Worker, WorkerId};

/// Set (or clear) the worker holding one task.
///
/// No eligibility or capacity check is made. Fails with
/// [`Error::TaskNotFound`] if the task is not in `tasks`, in which case
/// nothing is changed.
pub fn reassign(tasks: &[Task], task_id: TaskId, worker_id: Option<WorkerId>) -> Result<Vec<Task>> {
    if !tasks.iter().any(|t| t.id == task_id) {
        return Err(Error::TaskNotFound(task_id));
    }

    Ok(tasks
        .iter()
        .map(|t| {
            if t.id == task_id {
                Task { assigned_to: worker_id, ..t.clone() }
            } else {
                t.clone()
            }
        })
        .collect())
}

/// Rebuild every worker's workload from the task list.
///
/// A worker's load is the number of non-completed tasks assigned to it.
/// Previous workload values are ignored. Over-capacity loads are reported
/// as they are.
pub fn recompute_workloads(tasks: &[Task], workers: &[Worker]) -> Vec<Worker> {
    let mut loads: HashMap<WorkerId, u32> = HashMap::new();
    for task in tasks.iter().filter(|t| !t.completed) {
        if let Some(worker) = task.assigned_to {
            *loads.entry(worker).or_default() += 1;
        }
    }

    workers
        .iter()
        .map(|w| Worker {
            current_workload: loads.get(&w.id).copied().unwrap_or(0),
            ..w.clone()
        })
        .collect()
}
