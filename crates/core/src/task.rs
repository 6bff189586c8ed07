//! Task model - a unit of work with a priority and required skills.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use crate::id::{TaskId, WorkerId};

/// Task priority, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority
    Low,
    /// Medium priority
    Medium,
    /// High priority
    High,
}

impl Priority {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error for an unrecognised priority string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority '{0}' (expected low, medium or high)")]
pub struct UnknownPriority(pub String);

impl std::str::FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(UnknownPriority(s.to_string())),
        }
    }
}

/// A task to be placed on a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Skills needed; empty matches any worker
    pub required_skills: BTreeSet<String>,

    /// Priority
    pub priority: Priority,

    /// Whether the task is done
    #[serde(default)]
    pub completed: bool,

    /// Worker holding this task, if any.
    ///
    /// A weak reference: kept for display once the task is completed and
    /// cleared when the worker is deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<WorkerId>,
}

impl Task {
    /// Create an open, unassigned task with a fresh id.
    pub fn new<I, S>(
        title: impl Into<String>,
        description: impl Into<String>,
        required_skills: I,
        priority: Priority,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: TaskId::new(),
            title: title.into(),
            description: description.into(),
            required_skills: required_skills.into_iter().map(Into::into).collect(),
            priority,
            completed: false,
            assigned_to: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        match (self.completed, self.assigned_to) {
            (true, assigned_to) => TaskState::Completed { assigned_to },
            (false, Some(worker)) => TaskState::Assigned(worker),
            (false, None) => TaskState::Unassigned,
        }
    }

    /// Whether this task consumes capacity of the given worker.
    pub fn counts_against(&self, worker: WorkerId) -> bool {
        !self.completed && self.assigned_to == Some(worker)
    }

    /// Apply a partial update.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(skills) = patch.required_skills {
            self.required_skills = skills;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
    }
}

/// Task lifecycle.
///
/// `Unassigned <-> Assigned`, and either side toggles into `Completed`.
/// Toggling back out of `Completed` lands on `Assigned` when the retained
/// assignment is set, `Unassigned` otherwise. No state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Open and not placed
    Unassigned,
    /// Open and held by a worker
    Assigned(WorkerId),
    /// Done; the assignment is kept for display only
    Completed {
        /// Last worker holding the task
        assigned_to: Option<WorkerId>,
    },
}

/// Partial update for a task.
///
/// Assignment and completion go through reassignment and toggling so that
/// workloads are always recomputed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// Replacement skill requirements
    pub required_skills: Option<BTreeSet<String>>,

    /// New priority
    pub priority: Option<Priority>,
}

impl TaskPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.required_skills.is_none()
            && self.priority.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);

        let mut priorities = vec![Priority::Medium, Priority::High, Priority::Low];
        priorities.sort_by(|a, b| b.cmp(a));
        assert_eq!(priorities, vec![Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_state_transitions() {
        let worker = WorkerId::new();
        let mut task = Task::new("Build API", "", ["Node.js"], Priority::High);
        assert_eq!(task.state(), TaskState::Unassigned);

        task.assigned_to = Some(worker);
        assert_eq!(task.state(), TaskState::Assigned(worker));
        assert!(task.counts_against(worker));

        task.completed = true;
        assert_eq!(task.state(), TaskState::Completed { assigned_to: Some(worker) });
        assert!(!task.counts_against(worker));

        task.completed = false;
        assert_eq!(task.state(), TaskState::Assigned(worker));

        task.assigned_to = None;
        task.completed = true;
        task.completed = false;
        assert_eq!(task.state(), TaskState::Unassigned);
    }

    #[test]
    fn test_unassigned_is_omitted_from_json() {
        let task = Task::new("Design", "Dashboard", ["UI/UX"], Priority::Low);
        let json = serde_json::to_value(&task).unwrap();

        assert!(json.get("assignedTo").is_none());
        assert_eq!(json["priority"], "low");
        assert_eq!(json["requiredSkills"], serde_json::json!(["UI/UX"]));

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);
    }
}
