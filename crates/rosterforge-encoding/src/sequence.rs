//! Soft bounds on the length of contiguous runs of true indicators.

use rosterforge_core::model::{BoolVar, CpModel, Literal};
use rosterforge_core::BoundTuple;
use tracing::trace;

use crate::penalty::PenaltyTerm;

/// Clause that is false exactly when `works[start..start + length]` is an
/// isolated run of trues, bounded by a false or the sequence edge on both sides.
///
/// Requires `start + length <= works.len()`.
pub fn negated_bounded_span(works: &[BoolVar], start: usize, length: usize) -> Vec<Literal> {
    let mut span = Vec::with_capacity(length + 2);
    if start > 0 {
        span.push(works[start - 1].literal());
    }
    span.extend(works[start..start + length].iter().map(|&w| !w));
    if start + length < works.len() {
        span.push(works[start + length].literal());
    }
    span
}

/// Constrains every maximal run of trues in `works` to `[hard_min, hard_max]`
/// and returns one penalty term per flagged run outside `[soft_min, soft_max]`.
///
/// A run of length `L` below `soft_min` costs `min_cost * (soft_min - L)`;
/// above `soft_max` it costs `max_cost * (L - soft_max)`. Costs saturate at
/// `i64::MAX`.
pub fn add_soft_sequence_constraint(
    model: &mut CpModel,
    works: &[BoolVar],
    bounds: &BoundTuple,
    prefix: &str,
) -> Vec<PenaltyTerm> {
    let n = works.len();
    let mut penalties = Vec::new();
    if n == 0 {
        return penalties;
    }
    let hard_min = bounds.hard_min as usize;
    let hard_max = bounds.hard_max as usize;

    // Too short.
    for length in 1..hard_min.min(n + 1) {
        for start in 0..=(n - length) {
            model.add_bool_or(negated_bounded_span(works, start, length));
        }
    }

    if bounds.min_cost > 0 {
        let soft_min = bounds.soft_min as usize;
        for length in hard_min.max(1)..soft_min.min(n + 1) {
            for start in 0..=(n - length) {
                let label = format!("{}: under_span(start={}, length={})", prefix, start, length);
                let coefficient = bounds.min_cost.saturating_mul((soft_min - length) as i64);
                penalties.push(flag_span(model, works, start, length, coefficient, label));
            }
        }
    }

    if bounds.max_cost > 0 {
        let soft_max = bounds.soft_max as usize;
        let first = (soft_max + 1).max(hard_min).max(1);
        for length in first..=hard_max.min(n) {
            for start in 0..=(n - length) {
                let label = format!("{}: over_span(start={}, length={})", prefix, start, length);
                let coefficient = bounds.max_cost.saturating_mul((length - soft_max) as i64);
                penalties.push(flag_span(model, works, start, length, coefficient, label));
            }
        }
    }

    // Too long: no window of hard_max + 1 consecutive trues.
    if hard_max < n {
        for start in 0..(n - hard_max) {
            model.add_bool_or(works[start..=start + hard_max].iter().map(|&w| !w));
        }
    }

    trace!(
        event = "sequence_encoded",
        prefix,
        indicators = n,
        penalty_terms = penalties.len(),
    );
    penalties
}

/// Permits the isolated run at `start` only together with a fresh penalty literal.
fn flag_span(
    model: &mut CpModel,
    works: &[BoolVar],
    start: usize,
    length: usize,
    coefficient: i64,
    label: String,
) -> PenaltyTerm {
    let flag = model.new_bool_var(label.clone());
    let mut span = negated_bounded_span(works, start, length);
    span.push(flag.literal());
    model.add_bool_or(span);
    PenaltyTerm::new(flag, coefficient, label)
}

#[cfg(test)]
#[path = "sequence_tests.rs"]
mod tests;
