//! RosterForge - Shift scheduling compiled to a constraint model
//!
//! Describe days, employee policies and booking requirements, then call
//! [`solve_schedule`]. The request is compiled into a boolean/integer model
//! whose objective is the total soft-policy penalty, handed to a
//! [`ConstraintSolver`] backend and decoded back into per-day worker hours.
//!
//! # Example
//!
//! ```
//! use rosterforge::prelude::*;
//!
//! let problem = ScheduleProblem::new(2, vec![Day::new(6), Day::new(6)])
//!     .with_booking(BookingRequirement::new(0, 2, 2));
//! let config = SolverConfig::new()
//!     .with_node_limit(20_000)
//!     .with_defaults(PolicyDefaults::new(
//!         BoundTuple::new(1, 3, 1, 5, 6, 1),
//!         BoundTuple::hard(0, 12),
//!     ));
//!
//! let outcome = solve_schedule(&problem, &config, &mut BranchAndBoundSolver::new()).unwrap();
//! assert!(outcome.is_success());
//!
//! let schedule = outcome.schedule.unwrap();
//! assert_eq!(schedule.headcount(0, 2), 2);
//! ```

pub mod api;
pub mod extract;
pub mod manager;
mod solver;

pub use api::{BookingsRequest, DayRequest, PolicyRequest, ScheduleRequest, ScheduleResponse};
pub use extract::{extract_schedule, DaySchedule, EmployeeTotal, ScheduleResult, WorkerHours};
pub use manager::{JobStatus, SolveHandle, SolverManager};
pub use solver::{solve_schedule, solve_with_limits, PenaltyBreakdown, ScheduleOutcome};

pub use rosterforge_config::{EnvironmentMode, PolicyDefaults, SolverConfig};
pub use rosterforge_core::{
    BookingRequirement, BoundOverride, BoundTuple, Day, EmployeePolicy, Result, RosterError,
    ScheduleProblem,
};
pub use rosterforge_encoding::{CompiledModel, ModelAssembler};
pub use rosterforge_solver::{
    BranchAndBoundSolver, ConstraintSolver, CpSolution, SearchLimits, SearchStats, SolveStatus,
};

#[cfg(feature = "console")]
pub use rosterforge_console as console;

pub mod prelude {
    pub use super::{
        solve_schedule, BookingRequirement, BoundOverride, BoundTuple, BranchAndBoundSolver, Day,
        EmployeePolicy, PolicyDefaults, ScheduleOutcome, ScheduleProblem, SolveStatus,
        SolverConfig, SolverManager,
    };
}
