//! Worker model - a team member with a skill set and bounded capacity.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use crate::id::WorkerId;

/// A worker can hold up to `workload_capacity` open tasks at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    /// Unique identifier
    pub id: WorkerId,

    /// Display name
    pub name: String,

    /// Role on the team
    pub role: String,

    /// Skills, matched exactly and case-sensitively
    pub skills: BTreeSet<String>,

    /// Max number of non-completed tasks this worker may hold
    pub workload_capacity: u32,

    /// Number of non-completed tasks currently assigned.
    ///
    /// Derived from the task list; see the workload recalculator.
    #[serde(default)]
    pub current_workload: u32,
}

impl Worker {
    /// Create a worker with a fresh id and no workload.
    pub fn new<I, S>(name: impl Into<String>, role: impl Into<String>, skills: I, workload_capacity: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: WorkerId::new(),
            name: name.into(),
            role: role.into(),
            skills: skills.into_iter().map(Into::into).collect(),
            workload_capacity,
            current_workload: 0,
        }
    }

    /// Capacity left before the worker is saturated.
    pub fn remaining_capacity(&self) -> u32 {
        self.workload_capacity.saturating_sub(self.current_workload)
    }

    /// Whether the worker holds more open tasks than its capacity.
    ///
    /// Only reachable through manual reassignment.
    pub fn is_over_capacity(&self) -> bool {
        self.current_workload > self.workload_capacity
    }

    /// Apply a partial update.
    pub fn apply(&mut self, patch: WorkerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(skills) = patch.skills {
            self.skills = skills;
        }
        if let Some(capacity) = patch.workload_capacity {
            self.workload_capacity = capacity;
        }
    }
}

/// Partial update for a worker.
///
/// Identity and the derived workload are not editable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerPatch {
    /// New name
    pub name: Option<String>,

    /// New role
    pub role: Option<String>,

    /// Replacement skill set
    pub skills: Option<BTreeSet<String>>,

    /// New capacity
    pub workload_capacity: Option<u32>,
}

impl WorkerPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.role.is_none()
            && self.skills.is_none()
            && self.workload_capacity.is_none()
    }
}
