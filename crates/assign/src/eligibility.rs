//! Eligibility of a worker for a task.
//!
//! Skills are compared as exact, case-sensitive strings: `react` and
//! `React` are different skills.

use crewplan_core::{Task, Worker};

/// Whether `worker` may take `task` right now.
///
/// The worker must share at least one skill with the task (a task with no
/// required skills accepts anyone) and have spare capacity.
pub fn eligible(task: &Task, worker: &Worker) -> bool {
    has_capacity(worker) && has_skill(task, worker)
}

/// Number of the task's required skills the worker holds.
pub fn match_score(task: &Task, worker: &Worker) -> usize {
    task.required_skills.intersection(&worker.skills).count()
}

fn has_capacity(worker: &Worker) -> bool {
    worker.current_workload < worker.workload_capacity
}

fn has_skill(task: &Task, worker: &Worker) -> bool {
    task.required_skills.is_empty() || match_score(task, worker) > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewplan_core::Priority;

    fn task(skills: &[&str]) -> Task {
        Task::new("t", "", skills.iter().copied(), Priority::Medium)
    }

    fn worker(skills: &[&str], capacity: u32, load: u32) -> Worker {
        let mut w = Worker::new("w", "dev", skills.iter().copied(), capacity);
        w.current_workload = load;
        w
    }

    #[test]
    fn test_eligibility_table() {
        let cases: &[(&[&str], &[&str], u32, u32, bool)] = &[
            // (required, skills, capacity, load, eligible)
            (&["React"], &["React"], 1, 0, true),
            (&["React"], &["Node"], 1, 0, false),
            (&["React", "Node"], &["Node"], 3, 2, true),
            (&["React"], &["React"], 1, 1, false),
            (&["React"], &["React"], 0, 0, false),
            (&[], &[], 1, 0, true),
            (&[], &["Rust"], 1, 1, false),
            (&["React"], &["react"], 1, 0, false),
            (&["React"], &["React"], 1, 2, false),
        ];

        for (i, (required, skills, capacity, load, expected)) in cases.iter().enumerate() {
            let t = task(required);
            let w = worker(skills, *capacity, *load);
            assert_eq!(eligible(&t, &w), *expected, "case {}", i);
        }
    }

    #[test]
    fn test_match_score_counts_overlap() {
        let t = task(&["React", "Node", "SQL"]);

        assert_eq!(match_score(&t, &worker(&["React", "Node"], 1, 0)), 2);
        assert_eq!(match_score(&t, &worker(&["Go"], 1, 0)), 0);
        assert_eq!(match_score(&t, &worker(&["sql"], 1, 0)), 0);
        assert_eq!(match_score(&task(&[]), &worker(&["Go"], 1, 0)), 0);
    }
}
