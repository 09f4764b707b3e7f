//! Tests for the branch-and-bound backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rosterforge_core::model::{BoolVar, CpModel, LinearExpr, Literal};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use super::propagator::{ceil_div, floor_div};
use super::*;

fn solve(model: &CpModel) -> CpSolution {
    BranchAndBoundSolver::new().solve(model, &SearchLimits::new())
}

#[test]
fn test_rounding_division() {
    assert_eq!(floor_div(7, 2), 3);
    assert_eq!(floor_div(-7, 2), -4);
    assert_eq!(floor_div(7, -2), -4);
    assert_eq!(floor_div(-7, -2), 3);
    assert_eq!(ceil_div(7, 2), 4);
    assert_eq!(ceil_div(-7, 2), -3);
    assert_eq!(ceil_div(7, -2), -3);
    assert_eq!(ceil_div(-7, -2), 4);
    assert_eq!(ceil_div(6, 3), 2);
}

#[test]
fn test_luby_sequence() {
    let prefix: Vec<u64> = (1..=15).map(luby).collect();
    assert_eq!(prefix, vec![1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8]);
}

#[test]
fn test_mixed_sign_linear_bounds() {
    // 3x - 2y >= 7 over [0, 10]: the smallest x is 3, reached with y = 1.
    let mut model = CpModel::new("mixed");
    let x = model.new_int_var(0, 10, "x");
    let y = model.new_int_var(0, 10, "y");
    model.add_greater_or_equal(LinearExpr::term(x, 3).plus(y, -2), 7);
    model.add_greater_or_equal(LinearExpr::term(y, 1), 1);
    model.minimize(LinearExpr::term(x, 1));

    let solution = solve(&model);
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.value(x), Some(3));
    assert_eq!(solution.value(y), Some(1));
}

#[test]
fn test_first_solution_follows_hints() {
    let mut model = CpModel::new("hinted");
    let works: Vec<_> = (0..6).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    model.add_equality(LinearExpr::sum(works.iter().copied()), 3);
    for (i, &w) in works.iter().enumerate() {
        model.add_hint(w, i64::from(i >= 3));
    }

    let solution = solve(&model);
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.values, vec![0, 0, 0, 1, 1, 1]);
    assert_eq!(solution.stats.conflicts, 0);
}

#[test]
fn test_hints_outside_the_domain_are_clamped() {
    let mut model = CpModel::new("clamped");
    let n = model.new_int_var(2, 6, "n");
    let flag = model.new_bool_var("flag");
    model.add_hint(n, 40);
    model.add_hint(flag, -3);

    let solution = solve(&model);
    assert_eq!(solution.value(n), Some(6));
    assert_eq!(solution.boolean_value(flag), Some(false));
}

#[test]
fn test_infeasible_hint_still_finds_the_optimum() {
    let mut model = CpModel::new("misleading");
    let works: Vec<_> = (0..5).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    model.add_equality(LinearExpr::sum(works.iter().copied()), 2);
    model.minimize(LinearExpr::weighted_sum(
        works.iter().enumerate().map(|(i, &w)| (w, 5 - i as i64)),
    ));
    for &w in &works {
        model.add_hint(w, 1);
    }

    let solution = solve(&model);
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.objective_value, Some(3));
}

#[test]
fn test_restarts_keep_the_search_complete() {
    // Seven pigeons, six holes.
    let mut model = CpModel::new("pigeonhole");
    let sits: Vec<Vec<_>> = (0..7)
        .map(|p| (0..6).map(|h| model.new_bool_var(format!("p{p}_h{h}"))).collect())
        .collect();
    for pigeon in &sits {
        model.add_at_least_one(pigeon.iter().copied());
    }
    for h in 0..6 {
        model.add_less_or_equal(LinearExpr::sum(sits.iter().map(|p| p[h])), 1);
    }

    let solution = solve(&model);
    assert_eq!(solution.status, SolveStatus::Infeasible);
    assert!(solution.stats.restarts > 0);
}

#[test]
fn test_minimizes_objective() {
    let mut model = CpModel::new("pick_two");
    let works: Vec<_> = (0..4).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    model.add_equality(LinearExpr::sum(works.iter().copied()), 2);
    model.minimize(LinearExpr::weighted_sum([(works[0], 3), (works[1], 1), (works[2], 2)]));

    let solution = solve(&model);
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.objective_value, Some(1));
    assert_eq!(solution.boolean_value(works[1]), Some(true));
    assert_eq!(solution.boolean_value(works[3]), Some(true));
    assert!(model.check_assignment(&solution.values).is_ok());
    assert!(solution.stats.solutions >= 1);
}

#[test]
fn test_objective_constant_is_respected() {
    let mut model = CpModel::new("constant");
    let n = model.new_int_var(2, 6, "n");
    model.minimize(LinearExpr::term(n, 1).plus_constant(10));

    let solution = solve(&model);
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.value(n), Some(2));
    assert_eq!(solution.objective_value, Some(12));
}

#[test]
fn test_infeasible_model() {
    let mut model = CpModel::new("infeasible");
    let a = model.new_bool_var("a");
    let b = model.new_bool_var("b");
    model.add_equality(LinearExpr::sum([a, b]), 3);

    let solution = solve(&model);
    assert_eq!(solution.status, SolveStatus::Infeasible);
    assert!(!solution.has_solution());
    assert!(solution.values.is_empty());
    assert_eq!(solution.boolean_value(a), None);
}

#[test]
fn test_empty_domain_is_infeasible() {
    let mut model = CpModel::new("empty_domain");
    model.new_int_var(3, 1, "n");
    assert_eq!(solve(&model).status, SolveStatus::Infeasible);
}

#[test]
fn test_satisfaction_reports_optimal() {
    let mut model = CpModel::new("satisfy");
    let a = model.new_bool_var("a");
    let b = model.new_bool_var("b");
    model.add_bool_or([a.literal(), b.literal()]);
    model.add_implication(a.literal(), !b);

    let solution = solve(&model);
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.objective_value, None);
    assert!(model.check_assignment(&solution.values).is_ok());
}

#[test]
fn test_enforced_linear() {
    let mut model = CpModel::new("enforced");
    let gate = model.new_bool_var("gate");
    let x = model.new_int_var(0, 5, "x");
    model
        .add_equality(LinearExpr::term(x, 1), 3)
        .only_enforce_if([gate.literal()]);
    model.minimize(LinearExpr::term(gate, -1).plus(x, 0));

    let solution = solve(&model);
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.boolean_value(gate), Some(true));
    assert_eq!(solution.value(x), Some(3));
}

#[test]
fn test_violated_body_refutes_enforcement() {
    let mut model = CpModel::new("refute");
    let gate = model.new_bool_var("gate");
    let x = model.new_int_var(0, 2, "x");
    model
        .add_greater_or_equal(LinearExpr::term(x, 1), 5)
        .only_enforce_if([gate.literal()]);
    model.minimize(LinearExpr::term(gate, -1));

    let solution = solve(&model);
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.boolean_value(gate), Some(false));
}

#[test]
fn test_max_equality_excess() {
    // excess = max(0, 5 - Σ works) with at most three of four workers
    let mut model = CpModel::new("excess");
    let works: Vec<_> = (0..4).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    model.add_less_or_equal(LinearExpr::sum(works.iter().copied()), 3);
    let delta = model.new_int_var(-4, 5, "delta");
    model.add_equality(
        LinearExpr::sum(works.iter().copied())
            .plus(delta, 1)
            .plus_constant(-5),
        0,
    );
    let excess = model.new_int_var(0, 5, "excess");
    model.add_max_equality(excess, [delta], 0);
    model.minimize(LinearExpr::term(excess, 1));

    let solution = solve(&model);
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.objective_value, Some(2));
    assert_eq!(solution.value(delta), Some(2));
}

#[test]
fn test_bool_and_under_enforcement() {
    let mut model = CpModel::new("and");
    let a = model.new_bool_var("a");
    let b = model.new_bool_var("b");
    let c = model.new_bool_var("c");
    model.add_bool_and([!a, !b]).only_enforce_if([c.literal()]);
    model.add_bool_or([c.literal()]);
    model.minimize(LinearExpr::weighted_sum([(a, -1), (b, -1)]));

    let solution = solve(&model);
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.values, vec![0, 0, 1]);
}

#[test]
fn test_node_limit_without_solution_is_unknown() {
    let mut model = CpModel::new("limited");
    let works: Vec<_> = (0..6).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    model.add_equality(LinearExpr::sum(works), 3);

    let limits = SearchLimits::new().with_node_limit(0);
    let solution = BranchAndBoundSolver::new().solve(&model, &limits);
    assert_eq!(solution.status, SolveStatus::Unknown);
    assert!(!solution.has_solution());
}

#[test]
fn test_node_limit_after_solution_is_feasible() {
    let mut model = CpModel::new("limited");
    let works: Vec<_> = (0..8).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    model.add_equality(LinearExpr::sum(works.iter().copied()), 4);
    // First solution found sets the last four workers, which is the most expensive.
    let weights = works.iter().enumerate().map(|(i, &w)| (w, i as i64 + 1));
    model.minimize(LinearExpr::weighted_sum(weights));

    let limits = SearchLimits::new().with_node_limit(12);
    let solution = BranchAndBoundSolver::new().solve(&model, &limits);
    assert_eq!(solution.status, SolveStatus::Feasible);
    assert!(model.check_assignment(&solution.values).is_ok());
}

#[test]
fn test_expired_time_limit_without_solution_is_unknown() {
    let mut model = CpModel::new("timed");
    let works: Vec<_> = (0..4).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    model.add_at_least_one(works);

    let limits = SearchLimits::new().with_time_limit(Duration::ZERO);
    let solution = BranchAndBoundSolver::new().solve(&model, &limits);
    assert_eq!(solution.status, SolveStatus::Unknown);
}

/// Brute-force reference: feasibility and best objective over all 0/1 assignments.
fn enumerate(model: &CpModel) -> Option<i64> {
    let n = model.num_variables();
    let mut best: Option<i64> = None;
    for mask in 0u32..(1 << n) {
        let values: Vec<i64> = (0..n).map(|i| i64::from((mask >> i) & 1)).collect();
        if model.check_assignment(&values).is_ok() {
            let value = model.objective_value(&values).unwrap_or(0);
            best = Some(best.map_or(value, |b| b.min(value)));
        }
    }
    best
}

fn random_literal(rng: &mut ChaCha8Rng, vars: &[BoolVar]) -> Literal {
    let var = vars[rng.random_range(0..vars.len())];
    if rng.random_bool(0.5) {
        var.literal()
    } else {
        !var
    }
}

#[test]
fn test_matches_enumeration_on_random_models() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for round in 0..60 {
        let mut model = CpModel::new(format!("random_{round}"));
        let vars: Vec<_> = (0..7).map(|i| model.new_bool_var(format!("b{i}"))).collect();

        for _ in 0..rng.random_range(1..5) {
            let clause: Vec<_> = (0..rng.random_range(1..4))
                .map(|_| random_literal(&mut rng, &vars))
                .collect();
            model.add_bool_or(clause);
        }
        for _ in 0..rng.random_range(0..3) {
            let pairs: Vec<_> = vars
                .iter()
                .map(|&v| (v, rng.random_range(-2..3)))
                .collect();
            let lb = rng.random_range(-3..2);
            let ub = lb + rng.random_range(0..4);
            let gate = random_literal(&mut rng, &vars);
            let constraint = model.add_linear(LinearExpr::weighted_sum(pairs), lb, ub);
            if rng.random_bool(0.5) {
                constraint.only_enforce_if([gate]);
            }
        }
        if rng.random_bool(0.3) {
            let premise = random_literal(&mut rng, &vars);
            let literals: Vec<_> = (0..2).map(|_| random_literal(&mut rng, &vars)).collect();
            model.add_bool_and(literals).only_enforce_if([premise]);
        }
        let weights: Vec<_> = vars.iter().map(|&v| (v, rng.random_range(-3..4))).collect();
        model.minimize(LinearExpr::weighted_sum(weights));

        let expected = enumerate(&model);
        let solution = solve(&model);
        match expected {
            None => assert_eq!(solution.status, SolveStatus::Infeasible, "round {round}"),
            Some(best) => {
                assert_eq!(solution.status, SolveStatus::Optimal, "round {round}");
                assert_eq!(solution.objective_value, Some(best), "round {round}");
                assert!(model.check_assignment(&solution.values).is_ok());
            }
        }
    }
}

#[derive(Clone, Default)]
struct EventNames(Arc<Mutex<Vec<String>>>);

impl Visit for EventNames {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "event" {
            if let Ok(mut names) = self.0.lock() {
                names.push(value.to_string());
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "event" {
            self.record_str(field, format!("{value:?}").trim_matches('"'));
        }
    }
}

impl<S: Subscriber> Layer<S> for EventNames {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        event.record(&mut self.clone());
    }
}

#[test]
fn test_improving_solutions_are_reported_at_info() {
    let mut model = CpModel::new("logged");
    let works: Vec<_> = (0..3).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    model.add_at_least_one(works.iter().copied());
    model.minimize(LinearExpr::weighted_sum([(works[0], 1), (works[1], 2), (works[2], 3)]));

    let names = EventNames::default();
    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(names.clone());
    let solution = tracing::subscriber::with_default(subscriber, || solve(&model));

    assert_eq!(solution.status, SolveStatus::Optimal);
    let names = names.0.lock().unwrap();
    assert!(names.iter().any(|n| n == "solution_improved"));
    assert!(!names.iter().any(|n| n == "search_start"));
}
