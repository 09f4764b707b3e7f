//! RosterForge Core - Core types for shift-scheduling constraint compilation
//!
//! This crate provides the fundamental abstractions shared by every other
//! RosterForge crate:
//! - Scheduling domain types (days, policies, bookings)
//! - Bound tuples and their partial overrides
//! - The backend-neutral constraint model handed to a solver

pub mod bounds;
pub mod domain;
pub mod error;
pub mod model;

pub use bounds::{BoundOverride, BoundTuple};
pub use domain::{
    BookingRequirement, Day, EmployeePolicy, ScheduleProblem, ShiftOverride, MAX_DAY_HOURS,
};
pub use error::{Result, RosterError};
pub use model::{BoolVar, CpModel, IntVar, LinearExpr, Literal, VarId};
