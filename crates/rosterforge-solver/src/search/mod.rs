//! Reference backend: bounds propagation with depth-first branch and bound.
//!
//! Each node branches on the unfixed variable with the highest conflict
//! activity, ties broken by hint order and then creation order. The value
//! tried first is the variable's phase: its value in the best solution so
//! far, else its hint, else its lower bound. A run that exceeds its conflict
//! budget restarts from the root with budgets following the Luby sequence.
//! Each improving solution bounds the objective strictly below it, so a run
//! that exhausts its tree proves the last solution optimal.

mod domains;
mod propagator;

#[cfg(test)]
mod tests;

use std::collections::VecDeque;

use rosterforge_core::CpModel;
use tracing::{debug, info, trace};

use crate::backend::{ConstraintSolver, SearchLimits};
use crate::stats::SearchStats;
use crate::status::{CpSolution, SolveStatus};
use crate::termination::Termination;

use domains::{Domains, Propagation, HORIZON};
use propagator::Propagator;

/// Exhaustive branch-and-bound backend.
///
/// # Example
///
/// ```
/// use rosterforge_core::model::{CpModel, LinearExpr};
/// use rosterforge_solver::{BranchAndBoundSolver, ConstraintSolver, SearchLimits, SolveStatus};
///
/// let mut model = CpModel::new("pick_one");
/// let a = model.new_bool_var("a");
/// let b = model.new_bool_var("b");
/// model.add_at_least_one([a, b]);
/// model.minimize(LinearExpr::weighted_sum([(a, 2), (b, 1)]));
///
/// let solution = BranchAndBoundSolver::new().solve(&model, &SearchLimits::new());
/// assert_eq!(solution.status, SolveStatus::Optimal);
/// assert_eq!(solution.objective_value, Some(1));
/// assert_eq!(solution.boolean_value(b), Some(true));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBoundSolver;

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintSolver for BranchAndBoundSolver {
    fn solve(&mut self, model: &CpModel, limits: &SearchLimits) -> CpSolution {
        let termination = Termination::start(limits);
        let mut engine = Engine::new(model);
        let mut stats = SearchStats::default();
        let mut best: Option<(Vec<i64>, Option<i64>)> = None;

        debug!(
            event = "search_start",
            backend = self.name(),
            variables = model.num_variables(),
            propagators = engine.propagators.len(),
        );

        let mut runs = 0;
        let status = loop {
            runs += 1;
            let budget = RESTART_UNIT.saturating_mul(luby(runs));
            match engine.search(&termination, &mut stats, budget) {
                Outcome::Solution(values) => {
                    stats.record_solution();
                    let objective = model.objective_value(&values);
                    engine.save_phase(&values);
                    best = Some((values, objective));
                    match objective {
                        Some(value) => {
                            info!(
                                event = "solution_improved",
                                objective = value,
                                nodes = stats.nodes,
                            );
                            engine.bound_objective(value - 1);
                        }
                        None => break SolveStatus::Optimal,
                    }
                }
                Outcome::Restart => {
                    stats.record_restart();
                    trace!(event = "restart", run = runs, conflicts = stats.conflicts);
                }
                Outcome::Exhausted if best.is_some() => break SolveStatus::Optimal,
                Outcome::Exhausted => break SolveStatus::Infeasible,
                Outcome::Interrupted if best.is_some() => break SolveStatus::Feasible,
                Outcome::Interrupted => break SolveStatus::Unknown,
            }
        };
        stats.elapsed = termination.elapsed();

        debug!(
            event = "search_end",
            status = status.as_str(),
            nodes = stats.nodes,
            conflicts = stats.conflicts,
            solutions = stats.solutions,
            restarts = stats.restarts,
        );

        match best {
            Some((values, objective_value)) => CpSolution {
                status,
                values,
                objective_value,
                stats,
            },
            None => CpSolution::without_assignment(status, stats),
        }
    }

    fn name(&self) -> &'static str {
        "branch_and_bound"
    }
}

/// Conflicts allowed in a run of Luby weight one.
const RESTART_UNIT: u64 = 128;

/// Activity increment growth per conflict.
const ACTIVITY_DECAY: f64 = 0.95;

/// Element `index` (1-based) of the Luby sequence `1 1 2 1 1 2 4 1 1 2 ...`.
fn luby(mut index: u64) -> u64 {
    loop {
        let mut k = 1;
        while (1u64 << k) - 1 < index {
            k += 1;
        }
        if (1u64 << k) - 1 == index {
            return 1u64 << (k - 1);
        }
        index -= (1u64 << (k - 1)) - 1;
    }
}

enum Outcome {
    Solution(Vec<i64>),
    Exhausted,
    Interrupted,
    Restart,
}

/// One side of a binary split on a variable's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    AtMost(i64),
    AtLeast(i64),
}

impl Branch {
    fn negated(self) -> Branch {
        match self {
            Branch::AtMost(value) => Branch::AtLeast(value + 1),
            Branch::AtLeast(value) => Branch::AtMost(value - 1),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Decision {
    trail_len: usize,
    var: usize,
    branch: Branch,
}

struct Engine {
    domains: Domains,
    propagators: Vec<Propagator>,
    watchers: Vec<Vec<usize>>,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
    /// Index of the objective propagator and the objective constant.
    objective: Option<(usize, i64)>,
    /// Hinted variables first, then the rest in creation order.
    order: Vec<usize>,
    phase: Vec<Option<i64>>,
    activity: Vec<f64>,
    increment: f64,
}

impl Engine {
    fn new(model: &CpModel) -> Self {
        let mut propagators = Vec::new();
        for constraint in model.constraints() {
            Propagator::compile(constraint, &mut propagators);
        }
        let objective = model.objective().map(|expr| {
            propagators.push(Propagator::linear(expr, -HORIZON, HORIZON, Vec::new()));
            (propagators.len() - 1, expr.constant_term())
        });

        let domains = Domains::new(model);
        let mut watchers = vec![Vec::new(); domains.len()];
        for (index, propagator) in propagators.iter().enumerate() {
            for var in propagator.watched() {
                let list: &mut Vec<usize> = &mut watchers[var];
                if list.last() != Some(&index) {
                    list.push(index);
                }
            }
        }

        let mut phase = vec![None; domains.len()];
        let mut order = Vec::with_capacity(domains.len());
        for &(var, value) in model.hints() {
            let index = var.index();
            if index >= phase.len() {
                continue;
            }
            if phase[index].replace(value).is_none() {
                order.push(index);
            }
        }
        order.extend((0..domains.len()).filter(|&var| phase[var].is_none()));

        let queued = vec![false; propagators.len()];
        let activity = vec![0.0; domains.len()];
        Self {
            domains,
            propagators,
            watchers,
            queue: VecDeque::new(),
            queued,
            objective,
            order,
            phase,
            activity,
            increment: 1.0,
        }
    }

    /// Requires every later solution to have objective at most `bound`.
    fn bound_objective(&mut self, bound: i64) {
        if let Some((index, constant)) = self.objective {
            self.propagators[index].tighten_upper(bound.saturating_sub(constant));
        }
    }

    /// Makes `values` the first value tried for every variable.
    fn save_phase(&mut self, values: &[i64]) {
        for (phase, &value) in self.phase.iter_mut().zip(values) {
            *phase = Some(value);
        }
    }

    fn schedule(&mut self, propagator: usize) {
        if !self.queued[propagator] {
            self.queued[propagator] = true;
            self.queue.push_back(propagator);
        }
    }

    fn schedule_touched(&mut self) {
        for var in self.domains.take_touched() {
            for &p in &self.watchers[var] {
                if !self.queued[p] {
                    self.queued[p] = true;
                    self.queue.push_back(p);
                }
            }
        }
    }

    fn clear_queue(&mut self) {
        for p in self.queue.drain(..) {
            self.queued[p] = false;
        }
    }

    /// Runs propagators to a fixpoint.
    fn propagate(&mut self) -> Propagation {
        self.schedule_touched();
        while let Some(p) = self.queue.pop_front() {
            self.queued[p] = false;
            if let Err(conflict) = self.propagators[p].propagate(&mut self.domains) {
                self.clear_queue();
                self.bump(p);
                return Err(conflict);
            }
            self.schedule_touched();
        }
        Ok(())
    }

    /// Raises the activity of every variable the failing propagator watches.
    fn bump(&mut self, propagator: usize) {
        for var in self.propagators[propagator].watched() {
            self.activity[var] += self.increment;
        }
        self.increment /= ACTIVITY_DECAY;
        if self.increment > 1e100 {
            for activity in &mut self.activity {
                *activity *= 1e-100;
            }
            self.increment *= 1e-100;
        }
    }

    fn next_unfixed(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for &var in &self.order {
            if self.domains.is_fixed(var) {
                continue;
            }
            match best {
                Some(b) if self.activity[var] <= self.activity[b] => {}
                _ => best = Some(var),
            }
        }
        best
    }

    /// The side of `var`'s domain holding its phase value, which that side fixes
    /// whenever the value is a bound.
    fn preferred_branch(&self, var: usize) -> Branch {
        let (lb, ub) = (self.domains.lb(var), self.domains.ub(var));
        let value = self.phase[var].unwrap_or(lb).clamp(lb, ub);
        if value == ub {
            Branch::AtLeast(value)
        } else {
            Branch::AtMost(value)
        }
    }

    fn apply(&mut self, var: usize, branch: Branch) -> Propagation {
        match branch {
            Branch::AtMost(value) => self.domains.set_ub(var, value)?,
            Branch::AtLeast(value) => self.domains.set_lb(var, value)?,
        }
        self.propagate()
    }

    /// Pops decisions until one can be refuted without conflict.
    fn backtrack(&mut self, decisions: &mut Vec<Decision>, stats: &mut SearchStats) -> bool {
        while let Some(decision) = decisions.pop() {
            self.domains.undo_to(decision.trail_len);
            self.clear_queue();
            if self.apply(decision.var, decision.branch.negated()).is_ok() {
                return true;
            }
            stats.record_conflict();
        }
        false
    }

    /// Searches from the root for the next solution under the current objective
    /// bound, giving up after `budget` conflicts.
    fn search(&mut self, termination: &Termination, stats: &mut SearchStats, budget: u64) -> Outcome {
        self.domains.undo_to(0);
        self.clear_queue();
        if self.domains.has_empty_domain() {
            return Outcome::Exhausted;
        }
        for p in 0..self.propagators.len() {
            self.schedule(p);
        }
        if self.propagate().is_err() {
            stats.record_conflict();
            return Outcome::Exhausted;
        }

        let first_conflict = stats.conflicts;
        let mut decisions = Vec::new();
        loop {
            if termination.is_terminated(stats.nodes) {
                return Outcome::Interrupted;
            }
            let Some(var) = self.next_unfixed() else {
                return Outcome::Solution(self.domains.lower_bounds().to_vec());
            };
            stats.record_node();

            let decision = Decision {
                trail_len: self.domains.trail_len(),
                var,
                branch: self.preferred_branch(var),
            };
            decisions.push(decision);
            trace!(event = "decide", var, branch = ?decision.branch, depth = decisions.len());

            if self.apply(var, decision.branch).is_err() {
                stats.record_conflict();
                if !self.backtrack(&mut decisions, stats) {
                    return Outcome::Exhausted;
                }
                if stats.conflicts - first_conflict >= budget {
                    return Outcome::Restart;
                }
            }
        }
    }
}
