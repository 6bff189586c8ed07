//! crewplan core data models.
//!
//! Workers, tasks, their identifiers, and the roster that holds them.
//! Everything here is plain data; assignment decisions are made by
//! `crewplan-assign`.

#![warn(missing_docs)]

// Core identities
mod id;
mod error;

// Entities
mod worker;
mod task;

// Collections
mod roster;
mod draft;

// Re-exports
pub use id::*;
pub use error::{Error, Result};

pub use worker::{Worker, WorkerPatch};
pub use task::{Task, TaskPatch, TaskState, Priority, UnknownPriority};

pub use roster::Roster;
pub use draft::{ProjectDraft, MemberDraft, TaskDraft};
