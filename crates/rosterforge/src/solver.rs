//! Compiling a schedule, handing it to a backend and decoding the outcome.

use std::time::Instant;

use rosterforge_config::SolverConfig;
use rosterforge_core::{Result, RosterError, ScheduleProblem};
use rosterforge_encoding::{CompiledModel, ModelAssembler};
use rosterforge_solver::{ConstraintSolver, CpSolution, SearchLimits, SearchStats, SolveStatus};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::extract::{extract_schedule, ScheduleResult};

/// One active soft penalty in the winning assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyBreakdown {
    pub label: String,
    pub coefficient: i64,
    pub value: i64,
    /// `coefficient * value`.
    pub cost: i64,
}

/// Everything a solve produced.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    pub status: SolveStatus,
    /// Total penalty of the winning assignment.
    pub objective: Option<i64>,
    /// Penalty terms with a non-zero value, in registration order.
    pub penalties: Vec<PenaltyBreakdown>,
    pub schedule: Option<ScheduleResult>,
    pub stats: SearchStats,
}

impl ScheduleOutcome {
    /// True when the backend returned an assignment (optimal or merely feasible).
    pub fn is_success(&self) -> bool {
        self.status.has_solution()
    }

    /// Sum of the costs of every penalty whose label starts with `prefix`.
    ///
    /// ```
    /// use rosterforge::{solve_schedule, BranchAndBoundSolver, Day, ScheduleProblem};
    /// use rosterforge::{BoundTuple, PolicyDefaults, SolverConfig};
    ///
    /// let config = SolverConfig::new().with_defaults(PolicyDefaults::new(
    ///     BoundTuple::new(0, 3, 2, 24, 24, 0),
    ///     BoundTuple::hard(0, 24),
    /// ));
    /// let problem = ScheduleProblem::new(1, vec![Day::new(2)]);
    /// let outcome = solve_schedule(&problem, &config, &mut BranchAndBoundSolver::new()).unwrap();
    ///
    /// assert!(outcome.is_success());
    /// assert_eq!(outcome.penalty_cost("shift_constraint"), 2);
    /// ```
    pub fn penalty_cost(&self, prefix: &str) -> i64 {
        self.penalties
            .iter()
            .filter(|p| p.label.starts_with(prefix))
            .map(|p| p.cost)
            .sum()
    }
}

/// Solves `problem` with limits taken from `config`.
///
/// # Errors
///
/// Returns a configuration error when the problem references days, hours or
/// employees outside the grid, and an internal error when assertions are
/// enabled and the backend reports an assignment that breaks the model.
pub fn solve_schedule<B>(
    problem: &ScheduleProblem,
    config: &SolverConfig,
    backend: &mut B,
) -> Result<ScheduleOutcome>
where
    B: ConstraintSolver + ?Sized,
{
    solve_with_limits(problem, config, backend, SearchLimits::from_config(config))
}

/// Solves `problem` under explicit search limits.
pub fn solve_with_limits<B>(
    problem: &ScheduleProblem,
    config: &SolverConfig,
    backend: &mut B,
    limits: SearchLimits,
) -> Result<ScheduleOutcome>
where
    B: ConstraintSolver + ?Sized,
{
    #[cfg(feature = "console")]
    rosterforge_console::init();

    let started = Instant::now();
    let compiled = ModelAssembler::compile(problem, &config.defaults)?;

    info!(
        event = "solve_start",
        backend = backend.name(),
        employees = problem.employees,
        days = problem.day_count(),
        variables = compiled.model.num_variables(),
        constraints = compiled.model.num_constraints(),
        penalty_terms = compiled.penalties.len(),
        time_limit_ms = limits.time_limit.map_or(0, |t| t.as_millis() as u64),
    );

    let solution = backend.solve(&compiled.model, &limits);

    if config.environment_mode.is_asserted() {
        assert_solution(&compiled, &solution)?;
    }

    let outcome = decode(&compiled, solution);

    info!(
        event = "solve_end",
        status = outcome.status.as_str(),
        objective = outcome.objective.unwrap_or(0),
        nodes = outcome.stats.nodes,
        conflicts = outcome.stats.conflicts,
        duration_ms = started.elapsed().as_millis() as u64,
    );

    if !outcome.is_success() {
        warn!(
            event = "solve_unsuccessful",
            status = outcome.status.as_str(),
        );
    }

    Ok(outcome)
}

fn assert_solution(compiled: &CompiledModel, solution: &CpSolution) -> Result<()> {
    if !solution.has_solution() {
        return Ok(());
    }
    compiled
        .model
        .check_assignment(&solution.values)
        .map_err(|v| RosterError::Internal(format!("backend reported an invalid assignment: {}", v)))?;

    let expected = compiled.model.objective_value(&solution.values);
    if solution.objective_value.is_some() && solution.objective_value != expected {
        return Err(RosterError::Internal(format!(
            "backend reported objective {:?}, assignment evaluates to {:?}",
            solution.objective_value, expected
        )));
    }
    Ok(())
}

fn decode(compiled: &CompiledModel, solution: CpSolution) -> ScheduleOutcome {
    let schedule = extract_schedule(&compiled.grid, &solution);

    let penalties = if solution.has_solution() {
        compiled
            .penalties
            .iter()
            .filter_map(|term| {
                let value = solution.value(term.var)?;
                (value != 0).then(|| PenaltyBreakdown {
                    label: term.label.clone(),
                    coefficient: term.coefficient,
                    value,
                    cost: term.coefficient * value,
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let objective = if solution.has_solution() {
        solution
            .objective_value
            .or_else(|| compiled.model.objective_value(&solution.values))
    } else {
        None
    };

    ScheduleOutcome {
        status: solution.status,
        objective,
        penalties,
        schedule,
        stats: solution.stats,
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod tests;
