//! Tests for the no-gap channeling encoder.

use rosterforge_core::model::{CpModel, LinearExpr};
use rosterforge_solver::{BranchAndBoundSolver, ConstraintSolver, SearchLimits, SolveStatus};
use rosterforge_test::{bits_of, is_single_block, pin};

use super::*;

fn solve(model: &CpModel) -> rosterforge_solver::CpSolution {
    BranchAndBoundSolver::new().solve(model, &SearchLimits::new())
}

#[test]
fn test_admits_exactly_single_blocks() {
    let n = 6;
    for mask in 0..(1u32 << n) {
        let bits = bits_of(mask, n);
        let mut model = CpModel::new("no_gap");
        let works: Vec<_> = (0..n).map(|h| model.new_bool_var(format!("w{h}"))).collect();
        let channels = add_no_gap_constraint(&mut model, &works, "day");
        pin(&mut model, &works, &bits);

        let solution = solve(&model);
        if !is_single_block(&bits) {
            assert_eq!(solution.status, SolveStatus::Infeasible, "{:?}", bits);
            continue;
        }
        assert_eq!(solution.status, SolveStatus::Optimal, "{:?}", bits);
        for i in 0..n - 1 {
            let closes = bits[i] && !bits[i + 1];
            let opens = !bits[i] && bits[i + 1];
            assert_eq!(solution.boolean_value(channels.closing[i]), Some(closes));
            assert_eq!(solution.boolean_value(channels.opening[i]), Some(opens));
        }
    }
}

#[test]
fn test_short_sequences_are_noop() {
    let mut model = CpModel::new("short");
    let w = model.new_bool_var("w");
    let channels = add_no_gap_constraint(&mut model, &[w], "day");
    assert!(channels.closing.is_empty());
    assert_eq!(model.num_constraints(), 0);
}

fn pinned_block_model(pinned: &[usize]) -> (CpModel, Vec<BoolVar>) {
    let mut model = CpModel::new("block");
    let works: Vec<_> = (0..10).map(|h| model.new_bool_var(format!("w{h}"))).collect();
    for &p in pinned {
        model.add_equality(LinearExpr::term(works[p], 1), 1);
    }
    model.add_equality(LinearExpr::sum(works.iter().copied()), 6);
    add_no_gap_constraint(&mut model, &works, "day");
    (model, works)
}

#[test]
fn test_pinned_hour_yields_contiguous_block() {
    let (model, works) = pinned_block_model(&[1]);
    let solution = solve(&model);

    assert!(solution.status.has_solution());
    let bits: Vec<bool> = works
        .iter()
        .map(|&w| solution.boolean_value(w) == Some(true))
        .collect();
    assert!(is_single_block(&bits));
    assert!(bits[1]);
    assert_eq!(bits.iter().filter(|&&b| b).count(), 6);
}

#[test]
fn test_block_cannot_span_both_ends() {
    let (model, _) = pinned_block_model(&[1, 9]);
    assert_eq!(solve(&model).status, SolveStatus::Infeasible);
}
