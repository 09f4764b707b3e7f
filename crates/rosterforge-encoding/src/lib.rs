//! RosterForge Encoding - compiles scheduling rules into a constraint model
//!
//! Leaves first:
//! - [`ScheduleGrid`]: one work indicator per (employee, day, hour)
//! - [`sequence`], [`sum`], [`no_gap`]: reusable encoders over indicator lists
//! - [`coverage`]: booking and staffing-floor constraints
//! - [`PolicyResolver`]: concrete bound tuples from layered overrides
//! - [`GreedySchedule`]: a constructed starting schedule, passed on as search hints
//! - [`ModelAssembler`]: wires everything together and builds the objective

pub mod assembler;
pub mod coverage;
pub mod grid;
pub mod hint;
pub mod no_gap;
pub mod penalty;
pub mod resolve;
pub mod sequence;
pub mod sum;

pub use assembler::{CompiledModel, ModelAssembler, ResolvedPolicies};
pub use grid::ScheduleGrid;
pub use hint::{GreedySchedule, Shift};
pub use no_gap::{add_no_gap_constraint, NoGapChannels};
pub use penalty::{ObjectiveBuilder, PenaltyTerm};
pub use resolve::{resolve_bounds, PolicyResolver};
pub use sequence::{add_soft_sequence_constraint, negated_bounded_span};
pub use sum::add_soft_sum_constraint;
