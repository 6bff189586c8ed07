//! Work management - the hosting layer around the assignment core.
//!
//! Owns the read-modify-persist cycle and the per-roster lock.

#![warn(missing_docs)]

pub mod manager;

pub use manager::{AssignReport, ManagerConfig, Reassignment, RosterManager, WorkError, Result};
