//! Soft bounds on the number of true indicators.

use rosterforge_core::model::{BoolVar, CpModel, IntVar, LinearExpr};
use rosterforge_core::BoundTuple;
use tracing::trace;

use crate::penalty::PenaltyTerm;

/// Constrains the count of true `works` to `[hard_min, hard_max]` and returns
/// penalty terms weighing the shortfall below `soft_min` by `min_cost` and the
/// excess above `soft_max` by `max_cost`.
///
/// # Example
///
/// ```
/// use rosterforge_core::{BoundTuple, CpModel};
/// use rosterforge_encoding::add_soft_sum_constraint;
///
/// let mut model = CpModel::new("weekly");
/// let works: Vec<_> = (0..6).map(|h| model.new_bool_var(format!("w{h}"))).collect();
/// let penalties = add_soft_sum_constraint(
///     &mut model,
///     &works,
///     &BoundTuple::new(1, 3, 1, 4, 6, 2),
///     "weekly",
/// );
///
/// assert_eq!(penalties.len(), 2);
/// assert_eq!(penalties[0].label, "weekly: under_sum");
/// ```
pub fn add_soft_sum_constraint(
    model: &mut CpModel,
    works: &[BoolVar],
    bounds: &BoundTuple,
    prefix: &str,
) -> Vec<PenaltyTerm> {
    let hard_min = i64::from(bounds.hard_min);
    let hard_max = i64::from(bounds.hard_max);
    let mut penalties = Vec::new();

    // The domain of the sum is the hard bound.
    let sum = model.new_int_var(hard_min, hard_max, format!("{}: sum", prefix));
    model.add_equality(LinearExpr::sum(works.iter().copied()).plus(sum, -1), 0);

    if bounds.penalizes_shortfall() {
        let soft_min = i64::from(bounds.soft_min);
        let label = format!("{}: under_sum", prefix);
        let excess = clamped_excess(model, &label, soft_min - hard_max, soft_min - hard_min);
        // delta = soft_min - sum
        model.add_equality(
            LinearExpr::term(excess.delta, 1)
                .plus(sum, 1)
                .plus_constant(-soft_min),
            0,
        );
        penalties.push(PenaltyTerm::new(excess.excess, bounds.min_cost, label));
    }

    if bounds.penalizes_excess() {
        let soft_max = i64::from(bounds.soft_max);
        let label = format!("{}: over_sum", prefix);
        let excess = clamped_excess(model, &label, hard_min - soft_max, hard_max - soft_max);
        // delta = sum - soft_max
        model.add_equality(
            LinearExpr::term(excess.delta, 1)
                .plus(sum, -1)
                .plus_constant(soft_max),
            0,
        );
        penalties.push(PenaltyTerm::new(excess.excess, bounds.max_cost, label));
    }

    trace!(
        event = "sum_encoded",
        prefix,
        indicators = works.len(),
        penalty_terms = penalties.len(),
    );
    penalties
}

struct ClampedExcess {
    delta: IntVar,
    excess: IntVar,
}

/// `excess = max(delta, 0)` with `delta` ranging over `[lo, hi]`.
fn clamped_excess(model: &mut CpModel, label: &str, lo: i64, hi: i64) -> ClampedExcess {
    let delta = model.new_int_var(lo, hi, format!("{} delta", label));
    let excess = model.new_int_var(0, hi.max(0), label.to_string());
    model.add_max_equality(excess, [delta], 0);
    ClampedExcess { delta, excess }
}

#[cfg(test)]
#[path = "sum_tests.rs"]
mod tests;
