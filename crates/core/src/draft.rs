//! Project drafts produced by the roster generator.
//!
//! The generator turns a natural-language project description into a team
//! and a task list. Its payload carries no ids, workloads or completion
//! state; [`ProjectDraft::into_roster`] fills those in.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::roster::Roster;
use crate::task::{Priority, Task};
use crate::worker::Worker;

/// Generated team and tasks, in the generator's wire shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    /// Proposed team
    #[serde(default)]
    pub team_members: Vec<MemberDraft>,

    /// Proposed tasks
    #[serde(default)]
    pub tasks: Vec<TaskDraft>,
}

/// A proposed team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDraft {
    /// Name
    pub name: String,
    /// Role
    pub role: String,
    /// Skills
    #[serde(default)]
    pub skills: BTreeSet<String>,
    /// Max open tasks
    pub workload_capacity: u32,
}

/// A proposed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Title
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Required skills
    #[serde(default)]
    pub required_skills: BTreeSet<String>,
    /// Priority
    pub priority: Priority,
}

impl ProjectDraft {
    /// Parse a generator payload.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidDraft(e.to_string()))
    }

    /// Whether the draft proposes nothing at all.
    pub fn is_empty(&self) -> bool {
        self.team_members.is_empty() && self.tasks.is_empty()
    }

    /// Materialize the draft with fresh ids, zero workloads and open,
    /// unassigned tasks.
    pub fn into_roster(self) -> Roster {
        let workers = self
            .team_members
            .into_iter()
            .map(|m| Worker::new(m.name, m.role, m.skills, m.workload_capacity))
            .collect();
        let tasks = self
            .tasks
            .into_iter()
            .map(|t| Task::new(t.title, t.description, t.required_skills, t.priority))
            .collect();
        Roster::from_parts(workers, tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "teamMembers": [
            {"name": "Ada", "role": "Backend", "skills": ["Rust", "SQL"], "workloadCapacity": 3},
            {"name": "Lin", "role": "Frontend", "skills": ["React"], "workloadCapacity": 2}
        ],
        "tasks": [
            {"title": "Schema", "description": "Tables", "requiredSkills": ["SQL"], "priority": "high"},
            {"title": "Landing page", "description": "", "requiredSkills": [], "priority": "low"}
        ]
    }"#;

    #[test]
    fn test_into_roster_populates_runtime_fields() {
        let draft = ProjectDraft::from_json(PAYLOAD).unwrap();
        let roster = draft.into_roster();

        assert_eq!(roster.workers().len(), 2);
        assert_eq!(roster.tasks().len(), 2);
        assert!(roster.workers().iter().all(|w| w.current_workload == 0));
        assert!(roster.tasks().iter().all(|t| !t.completed && t.assigned_to.is_none()));
        assert_ne!(roster.workers()[0].id, roster.workers()[1].id);
        assert_eq!(roster.tasks()[0].priority, Priority::High);
        assert!(roster.tasks()[1].required_skills.is_empty());
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let draft = ProjectDraft::from_json(r#"{"tasks": []}"#).unwrap();
        assert!(draft.is_empty());
        assert_eq!(draft.into_roster(), Roster::new());
    }

    #[test]
    fn test_malformed_payload() {
        let err = ProjectDraft::from_json(r#"{"teamMembers": [{"name": 1}]}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidDraft(_)));

        let err = ProjectDraft::from_json(r#"{"tasks": [{"title": "x", "priority": "urgent"}]}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidDraft(_)));
    }
}
