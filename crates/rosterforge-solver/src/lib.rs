//! RosterForge Solver
//!
//! This crate provides the backend side of a solve:
//! - The [`ConstraintSolver`] contract every backend implements
//! - Outcome types (status, assignment, search statistics)
//! - Termination by wall clock, node count or an external flag
//! - [`BranchAndBoundSolver`], the reference backend

pub mod backend;
pub mod search;
pub mod stats;
pub mod status;
pub mod termination;

pub use backend::{ConstraintSolver, SearchLimits};
pub use search::BranchAndBoundSolver;
pub use stats::SearchStats;
pub use status::{CpSolution, SolveStatus};
pub use termination::Termination;
