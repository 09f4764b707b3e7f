//! Model assembly: grid, encoders, coverage and objective in one pass.

use rosterforge_config::PolicyDefaults;
use rosterforge_core::model::CpModel;
use rosterforge_core::{BoundTuple, Result, ScheduleProblem};
use tracing::debug;

use crate::coverage::{add_booking_constraints, add_coverage_floor};
use crate::grid::ScheduleGrid;
use crate::hint::GreedySchedule;
use crate::no_gap::add_no_gap_constraint;
use crate::penalty::{ObjectiveBuilder, PenaltyTerm};
use crate::resolve::PolicyResolver;
use crate::sequence::add_soft_sequence_constraint;
use crate::sum::add_soft_sum_constraint;

/// The bound tuples a model was compiled with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPolicies {
    /// Shift-length bounds indexed by `[employee][day]`.
    pub daily: Vec<Vec<BoundTuple>>,
    /// Total-hours bounds indexed by employee.
    pub weekly: Vec<BoundTuple>,
}

/// A complete model ready for a backend, with everything needed to read results back.
#[derive(Debug, Clone)]
pub struct CompiledModel {
    pub model: CpModel,
    pub grid: ScheduleGrid,
    /// Every objective term, in registration order.
    pub penalties: Vec<PenaltyTerm>,
    pub policies: ResolvedPolicies,
}

/// Compiles a [`ScheduleProblem`] into a [`CompiledModel`].
///
/// Every work indicator is hinted with a [`GreedySchedule`] of the problem.
///
/// # Example
///
/// ```
/// use rosterforge_config::PolicyDefaults;
/// use rosterforge_core::{BoundTuple, Day, ScheduleProblem};
/// use rosterforge_encoding::ModelAssembler;
///
/// let problem = ScheduleProblem::new(2, vec![Day::new(4)]);
/// let defaults = PolicyDefaults::new(BoundTuple::new(2, 3, 1, 4, 4, 0), BoundTuple::hard(0, 4));
///
/// let compiled = ModelAssembler::compile(&problem, &defaults).unwrap();
/// assert_eq!(compiled.grid.employees(), 2);
/// assert!(compiled.model.objective().is_some());
/// assert_eq!(compiled.model.hints().len(), 8);
/// ```
pub struct ModelAssembler<'a> {
    problem: &'a ScheduleProblem,
    defaults: &'a PolicyDefaults,
}

impl<'a> ModelAssembler<'a> {
    pub fn new(problem: &'a ScheduleProblem, defaults: &'a PolicyDefaults) -> Self {
        Self { problem, defaults }
    }

    /// Validates `problem` and compiles it with `defaults` as the global policy.
    pub fn compile(problem: &ScheduleProblem, defaults: &PolicyDefaults) -> Result<CompiledModel> {
        ModelAssembler::new(problem, defaults).build()
    }

    pub fn build(self) -> Result<CompiledModel> {
        let problem = self.problem;
        problem.validate()?;

        let mut model = CpModel::new("shift_scheduling");
        let day_hours: Vec<u32> = problem.days.iter().map(|d| d.hours).collect();
        let grid = ScheduleGrid::new(&mut model, problem.employees, &day_hours);
        let resolver = PolicyResolver::new(problem, self.defaults);
        let mut objective = ObjectiveBuilder::new();
        let mut policies = ResolvedPolicies::default();

        for e in 0..problem.employees {
            let mut daily = Vec::with_capacity(problem.day_count());
            for d in 0..problem.day_count() {
                let bounds = resolver.daily(e, d);
                let prefix = format!("shift_constraint(employee {}, day {})", e, d);
                objective.extend(add_soft_sequence_constraint(
                    &mut model,
                    &grid.day_works(e, d),
                    &bounds,
                    &prefix,
                ));
                daily.push(bounds);
            }
            policies.daily.push(daily);
        }

        add_booking_constraints(&mut model, &grid, &problem.bookings);

        for e in 0..problem.employees {
            let bounds = resolver.weekly(e);
            let prefix = format!("weekly_sum_constraint(employee {})", e);
            objective.extend(add_soft_sum_constraint(
                &mut model,
                &grid.employee_works(e),
                &bounds,
                &prefix,
            ));
            policies.weekly.push(bounds);
        }

        add_coverage_floor(&mut model, &grid);

        for e in 0..problem.employees {
            for d in 0..problem.day_count() {
                let prefix = format!("no_gap(employee {}, day {})", e, d);
                add_no_gap_constraint(&mut model, &grid.day_works(e, d), &prefix);
            }
        }

        let penalties = objective.finalize(&mut model);
        GreedySchedule::build(problem, &policies).apply_hints(&mut model, &grid);

        debug!(
            event = "model_compiled",
            employees = problem.employees,
            days = problem.day_count(),
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            penalty_terms = penalties.len(),
        );

        Ok(CompiledModel {
            model,
            grid,
            penalties,
            policies,
        })
    }
}

#[cfg(test)]
#[path = "assembler_tests.rs"]
mod tests;
