//! Assignment layer - eligibility, full re-assignment, and manual overrides.
//!
//! All operations are pure functions over a snapshot of workers and tasks;
//! the caller installs the returned collections.

#![warn(missing_docs)]

pub mod eligibility;
pub mod engine;
pub mod workload;
pub mod summary;

pub use eligibility::{eligible, match_score};
pub use engine::{assign_all, Assigner, Assignment, GreedyAssigner};
pub use workload::{reassign, recompute_workloads};
pub use summary::Summary;
